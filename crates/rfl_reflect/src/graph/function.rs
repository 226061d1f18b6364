use alloc::vec::Vec;
use core::fmt;

use crate::Name;
use crate::graph::{Parameter, ScopeOwner};

/// Address of a function in the exporting process.
///
/// Kept for diagnostics only: callables are attached through the registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct CallTarget(pub u64);

impl fmt::Debug for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallTarget({:#x})", self.0)
    }
}

/// A function node.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Function {
    pub name: Name,
    pub owner: ScopeOwner,
    pub call_target: CallTarget,
    /// `None` when the document declares no return parameter.
    pub return_param: Option<Parameter>,
    pub params: Vec<Parameter>,
}
