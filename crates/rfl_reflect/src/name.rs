use alloc::boxed::Box;
use core::fmt;
use core::hash::{Hash, Hasher};

use rfl_utils::hash::{NAME_HASH_SEED, murmur_hash2};

// -----------------------------------------------------------------------------
// NameHash

/// The stable 32-bit identity of a name.
///
/// Computed with MurmurHash2 over the UTF-8 bytes and the exporter's seed, so
/// the same text gives the same hash in every process. `0` is reserved for
/// "no name", which is what the exporter writes for a missing reference.
///
/// Collisions between distinct names are not detected.
///
/// # Examples
///
/// ```
/// use rfl_reflect::NameHash;
///
/// assert_eq!(NameHash::of("int"), NameHash::of("int"));
/// assert_ne!(NameHash::of("int"), NameHash::of("float"));
/// assert!(NameHash::NONE.is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct NameHash(u32);

impl NameHash {
    /// The "no name" hash.
    pub const NONE: Self = Self(0);

    /// Hashes `text`.
    #[inline]
    pub const fn of(text: &str) -> Self {
        Self(murmur_hash2(text.as_bytes(), NAME_HASH_SEED))
    }

    /// Wraps a hash that was computed elsewhere, usually by the exporter.
    #[inline(always)]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw 32-bit value.
    #[inline(always)]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` for [`NameHash::NONE`].
    #[inline(always)]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameHash({:#010x})", self.0)
    }
}

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

// -----------------------------------------------------------------------------
// Name

/// A `(text, hash)` pair.
///
/// Equality and hashing only look at the [`NameHash`]; the text is kept for
/// diagnostics.
///
/// # Examples
///
/// ```
/// use rfl_reflect::{Name, NameHash};
///
/// let name = Name::new("Config");
/// assert_eq!(name.text(), "Config");
/// assert_eq!(name.hash(), NameHash::of("Config"));
/// ```
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Name {
    text: Box<str>,
    hash: NameHash,
}

impl Name {
    /// Creates a name, hashing `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            hash: NameHash::of(text),
        }
    }

    /// Creates a name with a precomputed hash.
    pub fn with_hash(text: &str, hash: NameHash) -> Self {
        Self {
            text: text.into(),
            hash,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub const fn hash(&self) -> NameHash {
        self.hash
    }

    /// Returns `true` if this is the "no name" placeholder.
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.hash.is_none()
    }
}

impl PartialEq for Name {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Name {}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.text, self.hash)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::{Name, NameHash};

    #[test]
    fn hash_is_deterministic() {
        let a = NameHash::of("demo::Node");
        let b = NameHash::of("demo::Node");
        assert_eq!(a, b);
        assert_eq!(NameHash::of("int").get(), 0x981a_0134);
        assert_eq!(NameHash::of("Config").get(), 0xdb0b_ed8b);
    }

    #[test]
    fn equality_uses_hash() {
        let computed = Name::new("Config");
        let imported = Name::with_hash("Config (debug text)", NameHash::of("Config"));
        assert_eq!(computed, imported);
        assert_ne!(computed, Name::new("Config2"));
    }

    #[test]
    fn default_is_none() {
        let name = Name::default();
        assert!(name.is_none());
        assert_eq!(name.text(), "");
        assert!(!Name::new("").is_none());
    }
}
