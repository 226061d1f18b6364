use crate::NameHash;
use crate::graph::{FunctionHandle, TypeHandle};

// -----------------------------------------------------------------------------
// TypeRef

/// A reference from one graph record to a type.
///
/// The loader stores every reference as [`TypeRef::Unresolved`] while it
/// parses, and the patch phase rewrites each of them to either
/// [`TypeRef::Resolved`] or [`TypeRef::Absent`]. A module handed out by the
/// loader never holds an `Unresolved` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeRef {
    /// Full-name hash of the target, waiting for the patch phase.
    Unresolved(NameHash),
    /// The target type.
    Resolved(TypeHandle),
    /// No type: either the document named none or the name was not found.
    #[default]
    Absent,
}

impl TypeRef {
    /// The reference stored at parse time.
    ///
    /// A zero hash is the exporter's "no type" and becomes [`TypeRef::Absent`].
    #[inline]
    pub const fn placeholder(hash: NameHash) -> Self {
        if hash.is_none() {
            Self::Absent
        } else {
            Self::Unresolved(hash)
        }
    }

    /// Returns the handle if resolved.
    #[inline]
    pub const fn handle(self) -> Option<TypeHandle> {
        match self {
            Self::Resolved(handle) => Some(handle),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }
}

// -----------------------------------------------------------------------------
// FunctionRef

/// A reference from a type to one of its lifecycle functions.
///
/// The document identifies lifecycle functions by their position in the
/// owning type's function list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FunctionRef {
    /// Position in the owning type's function list, waiting for the patch phase.
    Ordinal(u32),
    /// The target function.
    Resolved(FunctionHandle),
    /// The type has no function for this role.
    #[default]
    Absent,
}

impl FunctionRef {
    /// Converts a document ordinal; negative values mean "none".
    #[inline]
    pub const fn from_ordinal(ordinal: i64) -> Self {
        if ordinal < 0 || ordinal > u32::MAX as i64 {
            Self::Absent
        } else {
            Self::Ordinal(ordinal as u32)
        }
    }

    #[inline]
    pub const fn handle(self) -> Option<FunctionHandle> {
        match self {
            Self::Resolved(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns `true` unless the reference is [`FunctionRef::Absent`].
    #[inline]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Absent)
    }
}
