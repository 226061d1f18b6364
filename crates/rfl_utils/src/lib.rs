//! Small shared utilities for the reflection runtime.
//!
//! - [`hash`]: the name hash used as identity throughout the type graph, and
//!   hash containers tuned for keys that are already hashes.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
