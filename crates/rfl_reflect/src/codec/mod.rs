//! Generic binary codec driven by the type graph.
//!
//! The [`Serializer`] and [`Deserializer`] walk an object the way its graph
//! type describes it:
//!
//! 1. a [`TypeHooks`] registered for the type (or, for a template instance,
//!    for the instantiated template) takes over the whole object;
//! 2. base types and enums are copied verbatim;
//! 3. classes are written field by field in declaration order, skipping
//!    fields marked `transient`;
//! 4. anything else is unsupported, see [`UnsupportedPolicy`].
//!
//! Fixed-size array fields, and the items of dynamic arrays, are copied in
//! one block when the element type declares no constructor, has no hooks
//! and is a base type, an enum or a POD class. Otherwise each element is
//! dispatched on its own.
//!
//! The stream has no envelope and no version marker. Values use the host
//! byte order and layout, so a stream is only readable by a process whose
//! module describes the same layouts.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod de;
mod dyn_array;
mod error;
mod hooks;
mod ser;
mod support;
mod text;

pub mod stream;

// -----------------------------------------------------------------------------
// Exports

pub use array::{ArrayStorage, RawArray};
pub use de::Deserializer;
pub use dyn_array::DynArray;
pub use error::CodecError;
pub use hooks::{DeserializeFn, SerializeFn, TypeHooks};
pub use ser::Serializer;
pub use text::TextStorage;

pub(crate) use support::is_supported;

use alloc::string::ToString;

use crate::graph::{Field, Module, Type, TypeHandle};

// -----------------------------------------------------------------------------
// UnsupportedPolicy

/// What the codec does with a value it cannot handle: a class without a
/// codec shape, a template instance without hooks, a pointer or reference
/// field, or a field whose type did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Return [`CodecError::Unsupported`] or [`CodecError::UnresolvedField`].
    #[default]
    Fail,
    /// Log a warning, then write or read nothing for the value.
    ///
    /// Both directions skip the same values, so a stream written with `Skip`
    /// is read back with `Skip`.
    Skip,
}

impl UnsupportedPolicy {
    fn unsupported(self, ty: &Type, reason: &'static str) -> Result<(), CodecError> {
        match self {
            Self::Fail => Err(CodecError::Unsupported {
                ty: ty.full_name().text().to_string(),
                reason,
            }),
            Self::Skip => {
                log::warn!("skipping `{}`: {reason}", ty.full_name());
                Ok(())
            }
        }
    }
}

/// Decides whether a field takes part in the stream.
///
/// Returns the field's type when it does, `None` when it is skipped.
fn field_type(
    module: &Module,
    policy: UnsupportedPolicy,
    owner: &Type,
    field: &Field,
) -> Result<Option<TypeHandle>, CodecError> {
    if field.is_transient() {
        return Ok(None);
    }
    if field.modifier.is_indirect() {
        log::debug!("`{}::{}` is indirect", owner.full_name(), field.name);
        policy.unsupported(owner, "pointer and reference fields are not serialized")?;
        return Ok(None);
    }
    match field.ty.handle() {
        Some(handle) => {
            debug_assert!(module.get_ty(handle).is_some());
            Ok(Some(handle))
        }
        None => match policy {
            UnsupportedPolicy::Fail => Err(CodecError::UnresolvedField {
                owner: owner.full_name().text().to_string(),
                field: field.name.text().to_string(),
            }),
            UnsupportedPolicy::Skip => {
                log::warn!(
                    "skipping `{}::{}`: its type is not resolved",
                    owner.full_name(),
                    field.name,
                );
                Ok(None)
            }
        },
    }
}
