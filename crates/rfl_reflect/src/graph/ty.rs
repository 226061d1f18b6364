use alloc::vec::Vec;
use core::alloc::Layout;

use crate::Name;
use crate::graph::{Attribute, Field, FunctionRef, Scope, TypeRef, TypeSlot, attribute};

// -----------------------------------------------------------------------------
// Kind payloads

/// Class specific data.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassInfo {
    /// Set by the exporter for plain-old-data classes.
    pub is_pod: bool,
    /// Data members in declaration order.
    pub fields: Vec<Field>,
    pub attributes: Vec<Attribute>,
}

impl ClassInfo {
    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        let hash = crate::NameHash::of(name);
        self.fields.iter().find(|field| field.name.hash() == hash)
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.attributes, name)
    }
}

/// Data of a concrete instantiation such as `DynArray<int>`.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InstanceInfo {
    /// The template this type instantiates.
    pub instance_of: TypeRef,
    /// Up to two type arguments, [`TypeRef::Absent`] when unused.
    pub args: [TypeRef; 2],
}

/// A named enumeration value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumEntry {
    pub name: Name,
    pub value: i32,
}

/// Enumeration data.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumInfo {
    pub entries: Vec<EnumEntry>,
}

impl EnumInfo {
    /// Looks an entry up by value.
    pub fn entry_for(&self, value: i32) -> Option<&EnumEntry> {
        self.entries.iter().find(|entry| entry.value == value)
    }
}

/// What a [`Type`] is.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeKind {
    /// A base type: copied verbatim by the codec.
    Primitive,
    Class(ClassInfo),
    /// A generic definition; only its instances have objects.
    Template,
    TemplateInstance(InstanceInfo),
    /// Copied verbatim by the codec.
    Enum(EnumInfo),
}

// -----------------------------------------------------------------------------
// Type

/// A type node.
///
/// # Layout
///
/// `layout` is validated by the loader: a non-zero power of two alignment and
/// a size that does not overflow when rounded up to it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Type {
    pub scope: Scope,
    /// Identifier assigned by the exporter.
    pub unique_id: u32,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_layout"))]
    pub layout: Layout,
    /// Static slot bound to this type during the bind phase.
    pub slot: Option<TypeSlot>,
    pub constructor: FunctionRef,
    pub destructor: FunctionRef,
    pub copy_constructor: FunctionRef,
    pub assignment: FunctionRef,
    pub kind: TypeKind,
}

impl Type {
    #[inline]
    pub fn name(&self) -> &Name {
        &self.scope.name
    }

    #[inline]
    pub fn full_name(&self) -> &Name {
        &self.scope.full_name
    }

    /// Size in bytes, as recorded by the exporter.
    #[inline]
    pub const fn size(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub const fn align(&self) -> usize {
        self.layout.align()
    }

    /// Returns `true` if the type declares a default constructor.
    #[inline]
    pub const fn is_constructible(&self) -> bool {
        self.constructor.is_present()
    }

    /// Returns `true` if the type declares a destructor.
    #[inline]
    pub const fn is_destructible(&self) -> bool {
        self.destructor.is_present()
    }

    #[inline]
    pub const fn is_copyable(&self) -> bool {
        self.copy_constructor.is_present()
    }

    #[inline]
    pub const fn is_assignable(&self) -> bool {
        self.assignment.is_present()
    }

    /// Returns `true` if objects of this type can be moved around as bytes:
    /// no constructor, destructor or copy operation is declared.
    #[inline]
    pub const fn is_trivial(&self) -> bool {
        !self.constructor.is_present()
            && !self.destructor.is_present()
            && !self.copy_constructor.is_present()
            && !self.assignment.is_present()
    }

    #[inline]
    pub const fn as_class(&self) -> Option<&ClassInfo> {
        match &self.kind {
            TypeKind::Class(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_instance(&self) -> Option<&InstanceInfo> {
        match &self.kind {
            TypeKind::TemplateInstance(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_enum(&self) -> Option<&EnumInfo> {
        match &self.kind {
            TypeKind::Enum(info) => Some(info),
            _ => None,
        }
    }

    /// Short lowercase label of the kind, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeKind::Primitive => "primitive",
            TypeKind::Class(_) => "class",
            TypeKind::Template => "template",
            TypeKind::TemplateInstance(_) => "template instance",
            TypeKind::Enum(_) => "enum",
        }
    }
}

#[cfg(feature = "serde")]
fn serialize_layout<S: serde::Serializer>(
    layout: &Layout,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("Layout", 2)?;
    state.serialize_field("size", &layout.size())?;
    state.serialize_field("align", &layout.align())?;
    state.end()
}
