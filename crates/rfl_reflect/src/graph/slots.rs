use core::fmt;
use core::num::NonZeroU64;

use rfl_utils::hash::HashMap;

use crate::graph::TypeHandle;

// -----------------------------------------------------------------------------
// TypeSlot

/// Key of a static type slot.
///
/// The exporter records, for each type, the address of the variable that
/// consumer code reads to find the type at run time. Here that address is only
/// used as a key: consumers name the slot through [`TypeOf::SLOT`] and the
/// bind phase fills it with the type's handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct TypeSlot(NonZeroU64);

impl TypeSlot {
    /// Returns `None` for zero, the exporter's "no slot".
    #[inline]
    pub const fn new(key: u64) -> Option<Self> {
        match NonZeroU64::new(key) {
            Some(key) => Some(Self(key)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for TypeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeSlot({:#x})", self.0)
    }
}

// -----------------------------------------------------------------------------
// TypeOf

/// Links a Rust type to the graph type bound at a slot.
///
/// # Safety
///
/// In every module this is used with, the type bound at [`TypeOf::SLOT`] must
/// describe `Self` exactly: same size and alignment, and every field at the
/// offset and with the type the graph records. Lifecycle callables registered
/// for that type must operate on `Self`.
///
/// # Examples
///
/// ```
/// use rfl_reflect::graph::TypeSlot;
/// use rfl_reflect::TypeOf;
///
/// #[repr(C)]
/// struct Pair {
///     a: i32,
///     b: i32,
/// }
///
/// // SAFETY: the exporter describes `Pair` as two `int` at offsets 0 and 4.
/// unsafe impl TypeOf for Pair {
///     const SLOT: TypeSlot = TypeSlot::new(0x40).unwrap();
/// }
/// ```
pub unsafe trait TypeOf: Sized {
    const SLOT: TypeSlot;
}

// -----------------------------------------------------------------------------
// TypeSlots

/// Table filled by the bind phase.
#[derive(Debug, Default)]
pub struct TypeSlots {
    table: HashMap<TypeSlot, TypeHandle>,
}

impl TypeSlots {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `slot`, returning the previously bound handle.
    #[inline]
    pub fn bind(&mut self, slot: TypeSlot, handle: TypeHandle) -> Option<TypeHandle> {
        self.table.insert(slot, handle)
    }

    #[inline]
    pub fn get(&self, slot: TypeSlot) -> Option<TypeHandle> {
        self.table.get(&slot).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (TypeSlot, TypeHandle)> + '_ {
        self.table.iter().map(|(slot, handle)| (*slot, *handle))
    }
}
