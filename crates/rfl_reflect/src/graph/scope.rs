use alloc::vec::Vec;

use crate::Name;
use crate::graph::{FunctionHandle, NamespaceHandle, TypeHandle};

/// The node that encloses a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScopeOwner {
    Namespace(NamespaceHandle),
    Type(TypeHandle),
}

/// The naming and containment part shared by namespaces and types.
///
/// Child lists keep document order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Scope {
    pub name: Name,
    pub full_name: Name,
    /// `None` only for the global namespace.
    pub parent: Option<ScopeOwner>,
    pub namespaces: Vec<NamespaceHandle>,
    pub primitives: Vec<TypeHandle>,
    pub classes: Vec<TypeHandle>,
    pub templates: Vec<TypeHandle>,
    pub template_instances: Vec<TypeHandle>,
    pub enums: Vec<TypeHandle>,
    pub functions: Vec<FunctionHandle>,
}

impl Scope {
    pub fn new(name: Name, full_name: Name, parent: Option<ScopeOwner>) -> Self {
        Self {
            name,
            full_name,
            parent,
            ..Self::default()
        }
    }

    /// Every child type, grouped by kind in the order primitives, classes,
    /// templates, template instances, enums.
    pub fn types(&self) -> impl Iterator<Item = TypeHandle> + '_ {
        self.primitives
            .iter()
            .chain(&self.classes)
            .chain(&self.templates)
            .chain(&self.template_instances)
            .chain(&self.enums)
            .copied()
    }
}

/// A namespace node.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Namespace {
    pub scope: Scope,
}
