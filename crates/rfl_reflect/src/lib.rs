//! Runtime reflection over an exported type database.
//!
//! A [`Module`] is loaded from the metadata document written by the exporter,
//! every cross reference is patched to a handle, and the resulting graph is
//! handed to a [`TypeRegistry`]. The registry is where lifecycle callables
//! and container hooks are attached, and the [`codec`] walks objects through
//! it to produce and consume a compact binary stream.
//!
//! # Examples
//!
//! ```
//! use rfl_reflect::Module;
//! use rfl_reflect::codec::{Deserializer, Serializer};
//! use rfl_reflect::registry::TypeRegistry;
//!
//! let xml = r#"
//! <RflDb><Namespace>
//!   <Name str="">0</Name><FullName str="">0</FullName>
//!   <BaseTypes>
//!     <BaseType><Name str="int"/><FullName str="int"/><Size>4</Size></BaseType>
//!   </BaseTypes>
//!   <Classes>
//!     <Class>
//!       <Name str="Pair"/><FullName str="Pair"/><Size>8</Size><IsPOD>true</IsPOD>
//!       <Fields>
//!         <Field><Name str="a"/><Type str="int"/><Offset>0</Offset></Field>
//!         <Field><Name str="b"/><Type str="int"/><Offset>4</Offset></Field>
//!       </Fields>
//!     </Class>
//!   </Classes>
//! </Namespace></RflDb>"#;
//!
//! let registry = TypeRegistry::new(Module::from_xml(xml).unwrap());
//! let pair = registry.module().find_type("Pair").unwrap();
//!
//! let value: [i32; 2] = [7, -1];
//! // SAFETY: `Pair` is laid out as two `int`s.
//! let bytes = unsafe { Serializer::new(&registry).to_bytes(pair, (&value).into()) }.unwrap();
//! assert_eq!(bytes.len(), 8);
//!
//! let mut back = [0_i32; 2];
//! // SAFETY: as above.
//! unsafe { Deserializer::new(&registry).from_bytes(pair, (&mut back).into(), &bytes) }.unwrap();
//! assert_eq!(back, value);
//! ```
#![expect(unsafe_code, reason = "erased objects are moved through raw memory.")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod name;

pub mod codec;
pub mod graph;
pub mod loader;
pub mod object;
pub mod registry;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use graph::{Module, TypeHandle, TypeOf};
pub use name::{Name, NameHash};
pub use registry::TypeRegistry;
