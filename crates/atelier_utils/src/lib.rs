//! Small shared utilities for the atelier crates.
//!
//! Currently this is the hashing layer: deterministic hashers and the
//! hash containers built on them.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
