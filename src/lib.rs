#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use atelier_event as event;
pub use atelier_meta as meta;
pub use atelier_ptr as ptr;
pub use atelier_settings as settings;
pub use atelier_utils as utils;
