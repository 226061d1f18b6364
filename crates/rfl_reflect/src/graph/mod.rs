//! The type graph: namespaces, types and functions of a loaded database.
//!
//! All records live in arenas owned by [`Module`] and refer to each other
//! through handles, so cycles such as a class holding a pointer to itself
//! need no shared ownership.

// -----------------------------------------------------------------------------
// Modules

mod attribute;
mod function;
mod handle;
mod module;
mod param;
mod refs;
mod scope;
mod slots;
mod ty;

// -----------------------------------------------------------------------------
// Exports

pub use attribute::{Attribute, AttributeValue, TRANSIENT};
pub use function::{CallTarget, Function};
pub use handle::{FunctionHandle, NamespaceHandle, TypeHandle};
pub use module::Module;
pub use param::{ArrayDesc, ArrayDescError, Field, Modifier, Parameter};
pub use refs::{FunctionRef, TypeRef};
pub use scope::{Namespace, Scope, ScopeOwner};
pub use slots::{TypeOf, TypeSlot, TypeSlots};
pub use ty::{ClassInfo, EnumEntry, EnumInfo, InstanceInfo, Type, TypeKind};
