use core::fmt;
use std::io::{Read, Write};

use rfl_ptr::{Ptr, PtrMut};

use crate::codec::{ArrayStorage, CodecError, Deserializer, Serializer, TextStorage, array, text};
use crate::graph::TypeHandle;

/// Writes an object of the hooked type.
///
/// The handle is the type being written; for a hook found on a template it is
/// the template instance, so the hook can read the type arguments.
pub type SerializeFn =
    unsafe fn(&Serializer<'_>, TypeHandle, Ptr<'_>, &mut dyn Write) -> Result<(), CodecError>;

/// Reads into a live object of the hooked type.
pub type DeserializeFn =
    unsafe fn(&Deserializer<'_>, TypeHandle, PtrMut<'_>, &mut dyn Read) -> Result<(), CodecError>;

/// Custom codec functions for one type or template.
///
/// Registered with [`TypeRegistry::register_hooks`]. A hook takes over the
/// whole object: the codec neither walks the fields of a hooked type nor
/// copies its bytes.
///
/// # Safety contract
///
/// Both functions are called with a pointer to a live object of the type the
/// hook was registered for (or of an instance of the hooked template).
///
/// [`TypeRegistry::register_hooks`]: crate::registry::TypeRegistry::register_hooks
#[derive(Clone, Copy)]
pub struct TypeHooks {
    pub serialize: SerializeFn,
    pub deserialize: DeserializeFn,
}

impl TypeHooks {
    #[inline]
    pub const fn new(serialize: SerializeFn, deserialize: DeserializeFn) -> Self {
        Self {
            serialize,
            deserialize,
        }
    }

    /// Hooks for a text buffer: a length prefix, then the bytes.
    #[inline]
    pub const fn text_buffer<S: TextStorage>() -> Self {
        Self::new(text::serialize::<S>, text::deserialize::<S>)
    }

    /// Hooks for a dynamic array template: a count prefix, then the
    /// elements, typed by the instance's first argument.
    #[inline]
    pub const fn dyn_array<S: ArrayStorage>() -> Self {
        Self::new(array::serialize::<S>, array::deserialize::<S>)
    }
}

impl fmt::Debug for TypeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHooks").finish_non_exhaustive()
    }
}
