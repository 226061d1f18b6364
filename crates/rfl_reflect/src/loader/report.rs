use alloc::vec::Vec;

use crate::graph::{ScopeOwner, TypeHandle};
use crate::{Name, NameHash};

/// A type reference that named no known type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnresolvedRef {
    pub hash: NameHash,
    /// Type or namespace whose record held the reference.
    pub referrer: ScopeOwner,
}

/// Two types sharing one full-name hash.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DuplicateName {
    pub name: Name,
    /// The definition the index kept.
    pub kept: TypeHandle,
    pub ignored: TypeHandle,
}

/// A lifecycle ordinal outside the owning type's function list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BadOrdinal {
    pub ty: TypeHandle,
    pub ordinal: u32,
}

/// Degradations recorded while loading.
///
/// A module with a non-empty report is still usable: every affected
/// reference has been set to absent.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoadReport {
    pub unresolved: Vec<UnresolvedRef>,
    pub duplicates: Vec<DuplicateName>,
    pub bad_ordinals: Vec<BadOrdinal>,
    /// Slots claimed by more than one type; the first type keeps the slot.
    pub rebound_slots: usize,
}

impl LoadReport {
    /// Returns `true` if nothing degraded.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
            && self.duplicates.is_empty()
            && self.bad_ordinals.is_empty()
            && self.rebound_slots == 0
    }
}
