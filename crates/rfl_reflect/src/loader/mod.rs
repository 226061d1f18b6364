//! Builds a [`Module`] from the exporter's XML document.
//!
//! Loading runs four phases in order:
//!
//! 1. **parse**: the document becomes arena records, with every type
//!    reference held as the target's full-name hash;
//! 2. **index**: full-name hashes are mapped to type handles;
//! 3. **patch**: every hash is replaced by a handle, or by absent when no
//!    type has that name, lifecycle ordinals become function handles and
//!    field bounds are checked;
//! 4. **bind**: types with a static slot are published in the slot table.
//!
//! Because references are only resolved after every record exists, forward
//! references and cycles need no special handling.

// -----------------------------------------------------------------------------
// Modules

mod bind;
mod document;
mod error;
mod link;
mod parse;
mod report;

// -----------------------------------------------------------------------------
// Exports

pub use error::LoadError;
pub use report::{BadOrdinal, DuplicateName, LoadReport, UnresolvedRef};

// -----------------------------------------------------------------------------
// Loader

use std::fs;
use std::path::Path;

use roxmltree::Document;

use crate::Module;

/// Options of a [`Loader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Fail with [`LoadError::Unresolved`] instead of degrading unknown type
    /// references to absent.
    pub deny_unresolved: bool,
}

/// Loads metadata documents.
///
/// # Examples
///
/// ```
/// use rfl_reflect::loader::{LoadError, LoadOptions, Loader};
///
/// let xml = r#"
///     <RflDb><Namespace>
///       <Classes><Class>
///         <Name str="A"/><FullName str="A"/><Size>4</Size>
///         <Fields><Field><Name str="x"/><Type str="Missing"/></Field></Fields>
///       </Class></Classes>
///     </Namespace></RflDb>"#;
///
/// let module = Loader::new().load_str(xml).unwrap();
/// assert_eq!(module.report().unresolved.len(), 1);
///
/// let strict = Loader::new().with_options(LoadOptions { deny_unresolved: true });
/// assert!(matches!(strict.load_str(xml), Err(LoadError::Unresolved { count: 1, .. })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    #[inline]
    pub const fn new() -> Self {
        Self {
            options: LoadOptions {
                deny_unresolved: false,
            },
        }
    }

    #[inline]
    pub const fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Reads and loads a document file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Module, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&text)
    }

    /// Loads a document held in memory.
    pub fn load_str(&self, xml: &str) -> Result<Module, LoadError> {
        let doc = Document::parse(xml)?;
        let mut module = Module::default();

        parse::parse(&doc, &mut module)?;
        log::debug!(
            "parsed {} namespace(s), {} type(s), {} function(s)",
            module.namespaces.len(),
            module.types.len(),
            module.functions.len(),
        );

        link::index(&mut module);
        link::patch(&mut module);
        if self.options.deny_unresolved {
            link::deny_unresolved(&module.report)?;
        }
        link::check_fields(&module)?;
        link::check_containment(&module)?;
        log::debug!(
            "patched references, {} unresolved",
            module.report.unresolved.len()
        );

        bind::bind(&mut module);
        Ok(module)
    }
}

impl Module {
    /// Loads a document file with default options.
    ///
    /// See [`Loader`] for the phases and [`LoadError`] for the failures.
    #[inline]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Loader::new().load_file(path)
    }

    /// Loads a document string with default options.
    #[inline]
    pub fn from_xml(xml: &str) -> Result<Self, LoadError> {
        Loader::new().load_str(xml)
    }
}
