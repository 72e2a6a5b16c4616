//! Per value type capabilities.
//!
//! A property can hold any type implementing [`MetaValue`]. The trait's
//! default methods all report "unsupported", and each value type opts into
//! the conversions it has: text, binary, data block, equality. Container
//! and pointer types additionally expose their shape (vector length,
//! pointee) so an inspector can recurse into them.
//!
//! [`impl_meta_value!`](crate::impl_meta_value) declares the common
//! capabilities from a list:
//!
//! ```ignore
//! impl_meta_value!(Color(string, binary, block, partial_eq));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod containers;
mod primitives;

pub mod enum_class;

// -----------------------------------------------------------------------------
// Exports

pub use containers::SharedObject;
pub use enum_class::EnumClass;

// -----------------------------------------------------------------------------
// ValueTraits

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::class::{MetaClass, MetaObject};
use crate::identity::ClassUid;
use crate::serialization::DataBlock;

bitflags::bitflags! {
    /// What a value type supports.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ValueTraits: u16 {
        /// Canonical text form.
        const STRING = 1 << 0;
        /// Binary snapshot.
        const BINARY = 1 << 1;
        /// Data block serialization.
        const DATA_BLOCK = 1 << 2;
        /// Equality comparison.
        const EQUALITY = 1 << 3;
        /// A resizable sequence.
        const VECTOR = 1 << 4;
        /// A shared-ownership pointer to a reflected object.
        const SHARED_PTR = 1 << 5;
        /// An enum class with display strings.
        const ENUM = 1 << 6;
        /// The value type has its own meta class.
        const REFLECTED = 1 << 7;
    }
}

// -----------------------------------------------------------------------------
// MetaValue

/// A type that can be held by a property binding.
///
/// Every method has a default reporting the capability as missing, so an
/// opaque value type only needs `impl MetaValue for T {}`.
pub trait MetaValue: Clone + 'static {
    /// The capabilities this type overrides.
    const TRAITS: ValueTraits = ValueTraits::empty();

    fn to_value_string(&self) -> Option<String> {
        None
    }

    /// Parses the canonical text form.
    fn from_value_str(text: &str) -> Option<Self> {
        let _ = text;
        None
    }

    fn binary_size(&self) -> Option<usize> {
        None
    }

    /// Writes the binary form to the front of `out`, returning the bytes written.
    fn write_binary(&self, out: &mut [u8]) -> Option<usize> {
        let _ = out;
        None
    }

    /// Reads the binary form, returning the value and the bytes read.
    fn read_binary(bytes: &[u8]) -> Option<(Self, usize)> {
        let _ = bytes;
        None
    }

    /// Equality when [`ValueTraits::EQUALITY`] is set, otherwise always `false`.
    fn value_eq(&self, other: &Self) -> bool {
        let _ = other;
        false
    }

    /// Writes into `block`, scalars as a single `"value"` parameter.
    fn to_data_block(&self, block: &mut DataBlock) -> bool {
        let _ = block;
        false
    }

    fn from_data_block(block: &DataBlock) -> Option<Self> {
        let _ = block;
        None
    }

    /// The declared meta class of the value, for reflected value types and
    /// pointers to them.
    fn value_meta_class() -> Option<&'static MetaClass> {
        None
    }

    /// The meta class of this particular value, which for a pointer is the
    /// most derived class of the pointee.
    fn runtime_meta_class(&self) -> Option<&'static MetaClass> {
        Self::value_meta_class()
    }

    /// Display strings of an enum class, without `None`.
    fn enum_strings() -> Vec<String> {
        Vec::new()
    }

    fn vector_len(&self) -> Option<usize> {
        None
    }

    /// Resizes a vector, default constructing new elements.
    fn set_vector_len(&mut self, len: usize) -> bool {
        let _ = len;
        false
    }

    fn vector_element_uid() -> ClassUid {
        ClassUid::NONE
    }

    /// The pointee of a shared-ownership pointer.
    fn pointee(&self) -> Option<Arc<dyn MetaObject>> {
        None
    }
}

// -----------------------------------------------------------------------------
// impl_meta_value

/// Implements [`MetaValue`] from a capability list.
///
/// - `string`: [`TextValue`](crate::serialization::TextValue)
/// - `binary`: [`BinaryValue`](crate::serialization::BinaryValue)
/// - `block`: [`ParamValue`](crate::serialization::ParamValue), stored as `"value"`
/// - `partial_eq`: [`PartialEq`]
///
/// The type must be named by a single identifier.
///
/// # Examples
///
/// ```
/// use atelier_meta::impl_meta_value;
/// use atelier_meta::value::{MetaValue, ValueTraits};
///
/// #[derive(Clone, PartialEq)]
/// struct Tag(u32);
///
/// impl_meta_value!(Tag(partial_eq));
///
/// assert_eq!(Tag::TRAITS, ValueTraits::EQUALITY);
/// assert!(Tag(1).value_eq(&Tag(1)));
/// assert!(Tag(1).to_value_string().is_none());
/// ```
#[macro_export]
macro_rules! impl_meta_value {
    (@flag string) => { $crate::value::ValueTraits::STRING };
    (@flag binary) => { $crate::value::ValueTraits::BINARY };
    (@flag block) => { $crate::value::ValueTraits::DATA_BLOCK };
    (@flag partial_eq) => { $crate::value::ValueTraits::EQUALITY };
    (@impl string) => {
        fn to_value_string(&self) -> ::core::option::Option<$crate::__macro_exports::String> {
            ::core::option::Option::Some($crate::serialization::TextValue::format_text(self))
        }

        fn from_value_str(text: &str) -> ::core::option::Option<Self> {
            $crate::serialization::TextValue::parse_text(text)
        }
    };
    (@impl binary) => {
        fn binary_size(&self) -> ::core::option::Option<usize> {
            ::core::option::Option::Some($crate::serialization::BinaryValue::encoded_len(self))
        }

        fn write_binary(&self, out: &mut [u8]) -> ::core::option::Option<usize> {
            $crate::serialization::BinaryValue::encode(self, out)
        }

        fn read_binary(bytes: &[u8]) -> ::core::option::Option<(Self, usize)> {
            $crate::serialization::BinaryValue::decode(bytes)
        }
    };
    (@impl block) => {
        fn to_data_block(&self, block: &mut $crate::serialization::DataBlock) -> bool {
            block.set_param(
                $crate::serialization::VALUE_PARAM,
                $crate::serialization::ParamValue::to_param(self),
            );
            true
        }

        fn from_data_block(block: &$crate::serialization::DataBlock) -> ::core::option::Option<Self> {
            $crate::serialization::ParamValue::from_param(
                block.get_param($crate::serialization::VALUE_PARAM)?,
            )
        }
    };
    (@impl partial_eq) => {
        #[inline]
        fn value_eq(&self, other: &Self) -> bool {
            self == other
        }
    };
    ($($ty:ident ( $($cap:ident),* $(,)? )),+ $(,)?) => {
        $(
            impl $crate::value::MetaValue for $ty {
                const TRAITS: $crate::value::ValueTraits = $crate::value::ValueTraits::empty()
                    $( .union($crate::impl_meta_value!(@flag $cap)) )*;

                $( $crate::impl_meta_value!(@impl $cap); )*
            }
        )+
    };
}
