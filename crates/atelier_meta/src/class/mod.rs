//! Class descriptors, property bindings and instance views.
//!
//! - [`MetaClass`]: one reflected type, its properties and super classes.
//! - [`MetaProperty`]: one named accessor pair, type-erased.
//! - [`ConstMetaInstance`] / [`MetaInstance`]: an object seen through one
//!   of its classes, with casts along the inheritance graph.
//! - [`Reflected`] / [`MetaObject`]: static and dynamic access to a type's
//!   class.
//!
//! Types are normally declared with [`impl_meta_class!`](crate::impl_meta_class).

// -----------------------------------------------------------------------------
// Modules

mod generic_property;
mod instance;
mod macros;
mod meta_class;
mod object;
mod property;

// -----------------------------------------------------------------------------
// Exports

pub use generic_property::GenericMetaProperty;
pub use instance::{ConstMetaInstance, MetaInstance};
pub use meta_class::{MetaClass, MetaClassBuilder, MetaClassCell, SuperClassLink};
pub use object::{MetaObject, Reflected};
pub use property::MetaProperty;
