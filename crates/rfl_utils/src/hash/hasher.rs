//! Hash states for tables keyed by type names and by name hashes.
//!
//! Type names go through [`FixedHashState`], a seeded `foldhash` state, so
//! two loads of the same database lay their tables out identically. Keys
//! that are already name hashes go through [`NoOpHashState`], which uses
//! the key itself.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// Seeded

const SEEDED: FixedState = FixedState::with_seed(0xB00D_FEED_5EED_F00D);

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// Seeded `foldhash` state. The seed never changes between runs.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use rfl_utils::hash::FixedHashState;
///
/// assert_eq!(
///     FixedHashState.hash_one("Config"),
///     FixedHashState.hash_one("Config"),
/// );
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> FixedHasher {
        SEEDED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Pass-through

/// Keeps the last integer key written as the hash.
///
/// A `u32` key is mirrored into the high half. hashbrown picks its control
/// byte from the top seven bits, which a plain widening leaves at zero.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        // Little-endian fold, so `write_u16(n)` and `write_u64(n)` agree.
        self.0 = bytes
            .iter()
            .rev()
            .fold(self.0, |acc, &b| (acc << 8) | u64::from(b));
    }

    #[inline]
    fn write_u32(&mut self, key: u32) {
        let key = u64::from(key);
        self.0 = (key << 32) | key;
    }

    #[inline]
    fn write_u64(&mut self, key: u64) {
        self.0 = key;
    }
}

/// Builds [`NoOpHasher`]s, for maps whose keys are already hashes.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use rfl_utils::hash::NoOpHashState;
///
/// assert_eq!(NoOpHashState.hash_one(7_u64), 7);
/// assert_eq!(NoOpHashState.hash_one(7_u32), (7 << 32) | 7);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> NoOpHasher {
        NoOpHasher::default()
    }
}
