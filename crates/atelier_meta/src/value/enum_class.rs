//! Enum classes: `i32` backed enums with display strings.
//!
//! Declared with [`meta_enum!`](crate::meta_enum). Variant `None = 0` is
//! always present and is the default; it is left out of the strings shown
//! in a dropdown.

use alloc::string::String;
use alloc::vec::Vec;

use crate::serialization::{BinaryValue, DataBlock, DataBlockParam, VALUE_PARAM};

/// An `i32` backed enum with named variants.
pub trait EnumClass: Copy + Eq + Default + 'static {
    /// Every variant with its name, `None` first.
    const VARIANTS: &'static [(Self, &'static str)];

    fn as_i32(self) -> i32;

    fn from_i32(value: i32) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(v, _)| v.as_i32() == value)
            .map(|(v, _)| *v)
    }

    fn as_str(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(v, _)| *v == self)
            .map_or("None", |(_, name)| name)
    }

    /// Parses a variant name, surrounding whitespace ignored.
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::VARIANTS
            .iter()
            .find(|(_, name)| *name == text)
            .map(|(v, _)| *v)
    }

    /// Every variant except `None`.
    fn all() -> Vec<Self> {
        Self::VARIANTS
            .iter()
            .map(|(v, _)| *v)
            .filter(|v| *v != Self::default())
            .collect()
    }

    /// Every variant name except `"None"`.
    fn all_strings() -> Vec<String> {
        Self::all().into_iter().map(|v| String::from(v.as_str())).collect()
    }

    fn all_strings_with_none() -> Vec<String> {
        Self::VARIANTS
            .iter()
            .map(|(_, name)| String::from(*name))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// MetaValue helpers

#[doc(hidden)]
pub fn encode<E: EnumClass>(value: E, out: &mut [u8]) -> Option<usize> {
    value.as_i32().encode(out)
}

#[doc(hidden)]
pub fn decode<E: EnumClass>(bytes: &[u8]) -> Option<(E, usize)> {
    let (raw, read) = i32::decode(bytes)?;
    Some((E::from_i32(raw)?, read))
}

#[doc(hidden)]
pub fn to_data_block<E: EnumClass>(value: E, block: &mut DataBlock) -> bool {
    block.set_param(VALUE_PARAM, DataBlockParam::String(String::from(value.as_str())));
    true
}

/// Accepts the variant name, or its integer value.
#[doc(hidden)]
pub fn from_data_block<E: EnumClass>(block: &DataBlock) -> Option<E> {
    let param = block.get_param(VALUE_PARAM)?;
    match param.as_str() {
        Some(name) => E::parse(name),
        None => E::from_i32(i32::try_from(param.as_i64()?).ok()?),
    }
}

// -----------------------------------------------------------------------------
// meta_enum

/// Declares an enum class.
///
/// A `None = 0` variant is inserted first and made the default.
///
/// # Examples
///
/// ```
/// use atelier_meta::meta_enum;
/// use atelier_meta::value::{EnumClass, MetaValue};
///
/// meta_enum! {
///     pub enum Filter {
///         Nearest = 1,
///         Linear,
///     }
/// }
///
/// assert_eq!(Filter::default(), Filter::None);
/// assert_eq!(Filter::Linear.as_i32(), 2);
/// assert_eq!(Filter::all_strings(), ["Nearest", "Linear"]);
/// assert_eq!(Filter::from_value_str("Linear"), Some(Filter::Linear));
/// assert_eq!(Filter::from_value_str("Cubic"), None);
/// ```
#[macro_export]
macro_rules! meta_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident $(= $value:expr)? ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
        #[repr(i32)]
        $vis enum $name {
            #[default]
            None = 0,
            $( $variant $(= $value)? ),+
        }

        impl $crate::value::EnumClass for $name {
            const VARIANTS: &'static [(Self, &'static str)] = &[
                (Self::None, "None"),
                $( (Self::$variant, ::core::stringify!($variant)) ),+
            ];

            #[inline]
            fn as_i32(self) -> i32 {
                self as i32
            }
        }

        impl $crate::value::MetaValue for $name {
            const TRAITS: $crate::value::ValueTraits = $crate::value::ValueTraits::ENUM
                .union($crate::value::ValueTraits::STRING)
                .union($crate::value::ValueTraits::BINARY)
                .union($crate::value::ValueTraits::DATA_BLOCK)
                .union($crate::value::ValueTraits::EQUALITY);

            fn to_value_string(&self) -> ::core::option::Option<$crate::__macro_exports::String> {
                ::core::option::Option::Some($crate::__macro_exports::String::from(
                    $crate::value::EnumClass::as_str(*self),
                ))
            }

            fn from_value_str(text: &str) -> ::core::option::Option<Self> {
                $crate::value::EnumClass::parse(text)
            }

            fn binary_size(&self) -> ::core::option::Option<usize> {
                ::core::option::Option::Some(::core::mem::size_of::<i32>())
            }

            fn write_binary(&self, out: &mut [u8]) -> ::core::option::Option<usize> {
                $crate::value::enum_class::encode(*self, out)
            }

            fn read_binary(bytes: &[u8]) -> ::core::option::Option<(Self, usize)> {
                $crate::value::enum_class::decode(bytes)
            }

            #[inline]
            fn value_eq(&self, other: &Self) -> bool {
                self == other
            }

            fn to_data_block(&self, block: &mut $crate::serialization::DataBlock) -> bool {
                $crate::value::enum_class::to_data_block(*self, block)
            }

            fn from_data_block(block: &$crate::serialization::DataBlock) -> ::core::option::Option<Self> {
                $crate::value::enum_class::from_data_block(block)
            }

            fn enum_strings() -> $crate::__macro_exports::Vec<$crate::__macro_exports::String> {
                <Self as $crate::value::EnumClass>::all_strings()
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::serialization::{DataBlock, DataBlockParam, VALUE_PARAM};
    use crate::value::{EnumClass, MetaValue, ValueTraits};

    crate::meta_enum! {
        enum Blend {
            Opaque,
            Additive = 4,
            Multiply,
        }
    }

    #[test]
    fn values_and_names() {
        assert_eq!(Blend::Opaque.as_i32(), 1);
        assert_eq!(Blend::Multiply.as_i32(), 5);
        assert_eq!(Blend::from_i32(4), Some(Blend::Additive));
        assert_eq!(Blend::from_i32(2), None);
        assert_eq!(Blend::None.as_str(), "None");
        assert_eq!(Blend::all_strings_with_none(), ["None", "Opaque", "Additive", "Multiply"]);
        assert_eq!(Blend::enum_strings(), ["Opaque", "Additive", "Multiply"]);
    }

    #[test]
    fn meta_value_capabilities() {
        assert!(Blend::TRAITS.contains(ValueTraits::ENUM | ValueTraits::EQUALITY));
        assert_eq!(Blend::from_value_str(" Multiply "), Some(Blend::Multiply));
        assert_eq!(Blend::from_value_str("multiply"), None);

        let mut buf = [0_u8; 4];
        assert_eq!(Blend::Additive.write_binary(&mut buf), Some(4));
        assert_eq!(Blend::read_binary(&buf), Some((Blend::Additive, 4)));
        assert_eq!(Blend::read_binary(&2_i32.to_le_bytes()), None);
    }

    #[test]
    fn data_block_accepts_name_or_number() {
        let mut block = DataBlock::new("");
        assert!(Blend::Opaque.to_data_block(&mut block));
        assert_eq!(block.get_string(VALUE_PARAM, ""), "Opaque");
        assert_eq!(Blend::from_data_block(&block), Some(Blend::Opaque));

        block.set_param(VALUE_PARAM, DataBlockParam::S32(5));
        assert_eq!(Blend::from_data_block(&block), Some(Blend::Multiply));
    }
}
