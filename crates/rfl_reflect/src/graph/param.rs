use alloc::vec::Vec;
use core::ops::Deref;

use thiserror::Error;

use crate::Name;
use crate::graph::{Attribute, TypeRef, attribute};

// -----------------------------------------------------------------------------
// Modifier

/// How a parameter or field holds its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Modifier {
    /// The value is stored inline.
    #[default]
    Value,
    /// A pointer to the type is stored.
    Pointer,
    /// A reference to the type is stored.
    Reference,
}

impl Modifier {
    /// Parses the document spelling, ignoring ASCII case.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("value") {
            Some(Self::Value)
        } else if text.eq_ignore_ascii_case("pointer") {
            Some(Self::Pointer)
        } else if text.eq_ignore_ascii_case("reference") {
            Some(Self::Reference)
        } else {
            None
        }
    }

    /// Returns `true` when the stored value is an address rather than the type.
    #[inline]
    pub const fn is_indirect(self) -> bool {
        !matches!(self, Self::Value)
    }
}

// -----------------------------------------------------------------------------
// ArrayDesc

/// Error returned by [`ArrayDesc::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ArrayDescError {
    #[error("array rank {0} is above 2")]
    Rank(i64),
    #[error("array dimension {0} is outside 0..=32767")]
    Dimension(i64),
}

/// Fixed array shape of a field or parameter.
///
/// Rank 0 is a scalar, rank 1 a single array and rank 2 a two-dimensional
/// array. Dimensions beyond the rank are kept at 1. A zero dimension is a
/// valid empty array.
///
/// # Examples
///
/// ```
/// use rfl_reflect::graph::ArrayDesc;
///
/// assert_eq!(ArrayDesc::SCALAR.element_count(), 1);
/// assert_eq!(ArrayDesc::new(1, 5, 1).unwrap().element_count(), 5);
/// assert_eq!(ArrayDesc::new(2, 2, 3).unwrap().element_count(), 6);
/// assert!(ArrayDesc::new(3, 1, 1).is_err());
/// assert_eq!(ArrayDesc::new(1, 0, 1).unwrap().element_count(), 0);
/// assert!(ArrayDesc::new(1, 40_000, 1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayDesc {
    rank: u8,
    dims: [u16; 2],
}

impl ArrayDesc {
    /// Largest accepted dimension.
    pub const MAX_DIM: u16 = 0x7FFF;

    /// A single value.
    pub const SCALAR: Self = Self {
        rank: 0,
        dims: [1, 1],
    };

    /// Validates a shape as read from the document.
    pub const fn new(rank: i64, dim0: i64, dim1: i64) -> Result<Self, ArrayDescError> {
        if rank < 0 || rank > 2 {
            return Err(ArrayDescError::Rank(rank));
        }
        let dim0 = if rank >= 1 {
            match Self::check_dim(dim0) {
                Ok(dim) => dim,
                Err(err) => return Err(err),
            }
        } else {
            1
        };
        let dim1 = if rank == 2 {
            match Self::check_dim(dim1) {
                Ok(dim) => dim,
                Err(err) => return Err(err),
            }
        } else {
            1
        };
        Ok(Self {
            rank: rank as u8,
            dims: [dim0, dim1],
        })
    }

    const fn check_dim(dim: i64) -> Result<u16, ArrayDescError> {
        if dim < 0 || dim > Self::MAX_DIM as i64 {
            Err(ArrayDescError::Dimension(dim))
        } else {
            Ok(dim as u16)
        }
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub const fn dims(self) -> [u16; 2] {
        self.dims
    }

    #[inline]
    pub const fn is_array(self) -> bool {
        self.rank > 0
    }

    /// Number of elements described by the shape.
    #[inline]
    pub const fn element_count(self) -> usize {
        match self.rank {
            0 => 1,
            1 => self.dims[0] as usize,
            _ => self.dims[0] as usize * self.dims[1] as usize,
        }
    }
}

impl Default for ArrayDesc {
    #[inline]
    fn default() -> Self {
        Self::SCALAR
    }
}

// -----------------------------------------------------------------------------
// Parameter

/// A typed, named slot: a function parameter or the common part of a field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Parameter {
    pub name: Name,
    pub ty: TypeRef,
    pub is_const: bool,
    pub modifier: Modifier,
    pub array: ArrayDesc,
}

impl Parameter {
    pub fn new(name: Name, ty: TypeRef) -> Self {
        Self {
            name,
            ty,
            is_const: false,
            modifier: Modifier::Value,
            array: ArrayDesc::SCALAR,
        }
    }
}

// -----------------------------------------------------------------------------
// Field

/// A data member of a class: a [`Parameter`] at a byte offset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Field {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub param: Parameter,
    pub offset: u32,
    pub attributes: Vec<Attribute>,
}

impl Field {
    pub fn new(param: Parameter, offset: u32) -> Self {
        Self {
            param,
            offset,
            attributes: Vec::new(),
        }
    }

    /// Returns `true` if the field carries `transient = true`.
    pub fn is_transient(&self) -> bool {
        attribute::find(&self.attributes, attribute::TRANSIENT)
            .and_then(Attribute::as_bool)
            .unwrap_or(false)
    }

    /// Finds an attribute by name.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.attributes, name)
    }
}

impl Deref for Field {
    type Target = Parameter;

    #[inline]
    fn deref(&self) -> &Parameter {
        &self.param
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{ArrayDesc, ArrayDescError, Field, Modifier, Parameter};
    use crate::Name;
    use crate::graph::{Attribute, AttributeValue, TypeRef};

    #[test]
    fn array_limits() {
        assert_eq!(ArrayDesc::new(1, 32767, 1).map(ArrayDesc::element_count), Ok(32767));
        assert_eq!(ArrayDesc::new(1, 32768, 1), Err(ArrayDescError::Dimension(32768)));
        assert_eq!(ArrayDesc::new(2, 3, 0).map(ArrayDesc::element_count), Ok(0));
        assert_eq!(ArrayDesc::new(1, -1, 1), Err(ArrayDescError::Dimension(-1)));
        assert_eq!(ArrayDesc::new(-1, 1, 1), Err(ArrayDescError::Rank(-1)));
        // Dimensions beyond the rank are ignored.
        assert_eq!(ArrayDesc::new(0, 0, 0), Ok(ArrayDesc::SCALAR));
        assert_eq!(ArrayDesc::new(1, 4, 99_999).map(|a| a.dims()), Ok([4, 1]));
    }

    #[test]
    fn modifier_spelling() {
        assert_eq!(Modifier::parse("Pointer"), Some(Modifier::Pointer));
        assert_eq!(Modifier::parse(" reference "), Some(Modifier::Reference));
        assert_eq!(Modifier::parse("VALUE"), Some(Modifier::Value));
        assert_eq!(Modifier::parse("handle"), None);
    }

    #[test]
    fn transient_attribute() {
        let mut field = Field::new(Parameter::new(Name::new("scratch"), TypeRef::Absent), 0);
        assert!(!field.is_transient());

        field.attributes = vec![Attribute::new(
            Name::new("transient"),
            AttributeValue::Int(1),
        )];
        assert!(!field.is_transient());

        field.attributes[0].value = AttributeValue::Bool(true);
        assert!(field.is_transient());
        assert_eq!(field.name.text(), "scratch");
    }
}
