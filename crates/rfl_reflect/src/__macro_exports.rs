//! Paths used by the exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub use inventory;
