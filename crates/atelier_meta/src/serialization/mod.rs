//! Value codecs and the structured serialization tree.
//!
//! - [`text`]: canonical string form of a value.
//! - [`binary`]: little-endian binary snapshots.
//! - [`DataBlock`]: a named tree of typed parameters.
//! - [`serialize_meta_instance`] / [`deserialize_meta_instance`]: flatten a
//!   reflected object into a [`DataBlock`] through its property bindings.

// -----------------------------------------------------------------------------
// Modules

mod data_block;
mod instance;
mod param;

pub mod binary;
pub mod text;

// -----------------------------------------------------------------------------
// Exports

pub use binary::BinaryValue;
pub use data_block::{DataBlock, DataBlockParam, DataBlockParamType};
pub use data_block::{CLASS_PARAM, ITEM_NAME, VALUE_PARAM};
pub use instance::{deserialize_meta_instance, serialize_meta_instance};
pub use param::ParamValue;
pub use text::TextValue;
