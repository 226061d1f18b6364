use alloc::string::String;
use std::io;

use thiserror::Error;

use crate::registry::LifecycleError;

/// Error returned by the binary codec.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The stream failed; truncated input reports
    /// [`io::ErrorKind::UnexpectedEof`].
    #[error("stream error: {0}")]
    Io(#[from] io::Error),
    /// The type has no serializable shape.
    #[error("`{ty}` is not serializable: {reason}")]
    Unsupported { ty: String, reason: &'static str },
    #[error("field `{field}` of `{owner}` has no resolved type")]
    UnresolvedField { owner: String, field: String },
    /// A template instance hook found no element type.
    #[error("`{0}` has no element type argument")]
    MissingElementType(String),
    #[error("`{ty}` received bytes that are not UTF-8")]
    InvalidText { ty: String },
    /// A length does not fit the 32-bit prefix or the address space.
    #[error("length {0} is out of range")]
    LengthOverflow(usize),
    /// A typed entry point found no type bound at the Rust type's slot.
    #[error("`{0}` is not bound to a type of this module")]
    UnboundType(&'static str),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
