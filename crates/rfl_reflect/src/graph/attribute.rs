use alloc::boxed::Box;

use crate::Name;

/// Name of the boolean field attribute that removes a field from the binary
/// stream.
pub const TRANSIENT: &str = "transient";

/// A typed value attached to a class or a field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A bare identifier, kept as text.
    Symbol(Box<str>),
    String(Box<str>),
}

/// A named annotation from the metadata document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    pub name: Name,
    pub value: AttributeValue,
}

impl Attribute {
    #[inline]
    pub fn new(name: Name, value: AttributeValue) -> Self {
        Self { name, value }
    }

    /// Returns the value if this is a boolean attribute.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            AttributeValue::Bool(value) => Some(value),
            _ => None,
        }
    }
}

/// Finds an attribute by name in a slice.
pub(crate) fn find<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    let hash = crate::NameHash::of(name);
    attributes.iter().find(|attr| attr.name.hash() == hash)
}
