use alloc::string::String;
use std::io;
use std::path::PathBuf;

use roxmltree::TextPos;
use thiserror::Error;

use crate::NameHash;
use crate::graph::ArrayDescError;

/// Error returned when a metadata document cannot become a [`Module`].
///
/// No partial module is produced on error.
///
/// [`Module`]: crate::Module
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed document: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("document has no `RflDb/Namespace` root")]
    MissingRoot,
    #[error("`{element}` at {pos} is not a valid integer: {text:?}")]
    InvalidInteger {
        element: &'static str,
        text: String,
        pos: TextPos,
    },
    #[error("`{element}` at {pos} has an unknown value: {text:?}")]
    InvalidValue {
        element: &'static str,
        text: String,
        pos: TextPos,
    },
    #[error("invalid array shape at {pos}: {source}")]
    InvalidArray {
        pos: TextPos,
        #[source]
        source: ArrayDescError,
    },
    #[error("type `{name}` has an invalid layout: size {size}, align {align}")]
    InvalidLayout { name: String, size: u64, align: u64 },
    #[error("field `{field}` of `{owner}` ends at byte {end}, past the type size {size}")]
    FieldOutOfBounds {
        owner: String,
        field: String,
        end: u64,
        size: usize,
    },
    #[error("type `{0}` contains itself by value")]
    RecursiveLayout(String),
    #[error("{count} type reference(s) could not be resolved, first {first}")]
    Unresolved { count: usize, first: NameHash },
    #[error("document holds more records than a handle can address")]
    TooManyRecords,
}
