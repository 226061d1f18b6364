//! Run-time data attached to a loaded module.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: owns the [`Module`](crate::Module) and everything
//!   registered for it.
//! - [`Lifecycle`]: constructor, destructor, copy and assignment callables
//!   for one type, bound to the functions the graph declares for them.
//! - [`TypeMeta`]: per-type data such as codec hooks.
//! - [`Capabilities`]: what can be done with objects of a type.
//! - [`BuiltinNames`]: which types receive the built-in codec hooks.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, [`auto_register!`](crate::auto_register)
//! submits lifecycles through the [`inventory`] crate and
//! [`TypeRegistry::auto_register`] applies them. Platforms `inventory` does
//! not support simply apply nothing.

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto;
mod builtin;
mod capabilities;
mod lifecycle;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto::AutoRegistration;
pub use builtin::BuiltinNames;
pub use capabilities::Capabilities;
pub use lifecycle::{
    AssignFn, Callable, ConstructFn, CopyFn, DestructFn, Lifecycle, LifecycleError, Role,
};
pub use type_meta::TypeMeta;
pub use type_registry::TypeRegistry;
