use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

/// Full names that receive the built-in codec hooks.
///
/// Types in `text` get the text-buffer hooks for [`String`]; templates in
/// `arrays` get the dynamic-array hooks, which every instance of them then
/// uses. A Rust field behind such a type must be a `String` or a
/// [`DynArray`] respectively.
///
/// # Examples
///
/// ```
/// use rfl_reflect::registry::BuiltinNames;
///
/// let names = BuiltinNames::default().with_text("core::Text");
/// assert_eq!(names.text, ["String", "core::Text"]);
/// assert_eq!(names.arrays, ["DynArray"]);
/// ```
///
/// [`DynArray`]: crate::codec::DynArray
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinNames {
    pub text: Vec<Cow<'static, str>>,
    pub arrays: Vec<Cow<'static, str>>,
}

impl BuiltinNames {
    /// No names at all.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            text: Vec::new(),
            arrays: Vec::new(),
        }
    }

    pub fn with_text(mut self, full_name: impl Into<Cow<'static, str>>) -> Self {
        self.text.push(full_name.into());
        self
    }

    pub fn with_array(mut self, full_name: impl Into<Cow<'static, str>>) -> Self {
        self.arrays.push(full_name.into());
        self
    }
}

impl Default for BuiltinNames {
    fn default() -> Self {
        Self {
            text: vec![Cow::Borrowed("String")],
            arrays: vec![Cow::Borrowed("DynArray")],
        }
    }
}
