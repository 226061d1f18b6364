//! Lifetime-carrying pointers to reflected objects whose Rust type is unknown
//! at the call site.
//!
//! The reflection runtime only ever sees an object as "`size` bytes at some
//! address, laid out as the type graph says". These wrappers keep that view
//! honest by attaching a lifetime and by separating shared, exclusive and
//! owning access:
//!
//! - [`Ptr<'a>`]: shared access, like `&'a [u8; size]` of an erased value.
//! - [`PtrMut<'a>`]: exclusive access to a live value.
//! - [`OwningPtr<'a>`]: exclusive access plus the obligation to drop or move
//!   the pointee. It never frees memory; storage belongs to someone else.
//!
//! Offsets are always counted in bytes, which is what field offsets coming
//! from a metadata document are.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod type_erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use type_erased::{OwningPtr, Ptr, PtrMut};
