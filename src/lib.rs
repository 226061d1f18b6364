#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use rfl_ptr as ptr;
pub use rfl_reflect as reflect;
pub use rfl_utils as utils;
