//! Runtime reflection for editor tooling.
//!
//! A type is described by a [`MetaClass`](class::MetaClass): its identity,
//! an ordered list of named property bindings, and links to the base
//! objects it embeds. Given a [`MetaInstance`](class::MetaInstance) of any
//! object, a property declared on the object's own class or on any of its
//! ancestors can be read, written, stringified and serialized without the
//! caller knowing the concrete type.
//!
//! ## Menu
//!
//! - [`identity`]: class UIDs and display names.
//! - [`class`]: class descriptors, property bindings, instance views.
//! - [`registry`]: the process-wide UID to class table.
//! - [`value`]: per value type capabilities (string, binary, data block, equality).
//! - [`serialization`]: text and binary codecs, the [`DataBlock`](serialization::DataBlock) tree.
//! - [`math`]: small math types used as property values.
//!
//! ## Declaring a class
//!
//! ```
//! use atelier_meta::class::{ConstMetaInstance, Reflected};
//! use atelier_meta::impl_meta_class;
//!
//! #[derive(Default)]
//! struct Base {
//!     value: i32,
//! }
//!
//! #[derive(Default)]
//! struct Derived {
//!     base: Base,
//!     name: String,
//! }
//!
//! impl_meta_class!(Base {
//!     "value": i32 => |s| s.value, |s, v| s.value = v;
//! });
//!
//! impl_meta_class!(Derived: Base(base) {
//!     "name": String => |s| s.name.clone(), |s, v| s.name = v;
//! });
//!
//! let object = Derived { base: Base { value: 3 }, name: "cube".into() };
//! let instance = ConstMetaInstance::new(&object);
//!
//! let value = Derived::meta_class().property_by_name("value", true).unwrap();
//! assert_eq!(value.value_to_string(instance).as_deref(), Some("3"));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod class;
pub mod identity;
pub mod math;
pub mod registry;
pub mod serialization;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::RegistrationError;
pub use glam;
