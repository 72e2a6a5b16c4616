//! Small math types used as property values.
//!
//! Vectors and matrices come from [`glam`]; this module adds the
//! axis-aligned rectangle used by editor layouts.

use alloc::string::String;
use core::ops::{Add, Sub};

use crate::serialization::{BinaryValue, DataBlockParam, ParamValue, TextValue};
use crate::serialization::binary::{decode_components, encode_components};
use crate::serialization::text::{format_components, parse_components};

// -----------------------------------------------------------------------------
// Rect2

/// An axis-aligned rectangle, stored as position and size.
///
/// The text form is `"x,y,width,height"`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect2<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

pub type Rect2F = Rect2<f32>;
pub type Rect2S = Rect2<i32>;

impl<T> Rect2<T> {
    #[inline]
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Self { x, y, width, height }
    }
}

impl<T: Copy + Add<Output = T> + Sub<Output = T> + PartialOrd> Rect2<T> {
    /// A rectangle spanning two corners.
    pub fn from_min_max(min: [T; 2], max: [T; 2]) -> Self {
        Self::new(min[0], min[1], max[0] - min[0], max[1] - min[1])
    }

    #[inline]
    pub fn min(&self) -> [T; 2] {
        [self.x, self.y]
    }

    #[inline]
    pub fn max(&self) -> [T; 2] {
        [self.x + self.width, self.y + self.height]
    }

    /// `true` if the point lies inside, the min edge included.
    pub fn contains(&self, point: [T; 2]) -> bool {
        let max = self.max();
        point[0] >= self.x && point[1] >= self.y && point[0] < max[0] && point[1] < max[1]
    }

    /// `true` if either side is not positive.
    pub fn is_empty(&self) -> bool {
        let max = self.max();
        !(max[0] > self.x && max[1] > self.y)
    }
}

impl<T: Copy> From<Rect2<T>> for [T; 4] {
    #[inline]
    fn from(rect: Rect2<T>) -> Self {
        [rect.x, rect.y, rect.width, rect.height]
    }
}

impl<T: Copy> From<[T; 4]> for Rect2<T> {
    #[inline]
    fn from([x, y, width, height]: [T; 4]) -> Self {
        Self { x, y, width, height }
    }
}

// -----------------------------------------------------------------------------
// Codecs

macro_rules! impl_rect_codecs {
    ($($scalar:ty => $param:ident, $vec:ty);* $(;)?) => {
        $(
            impl TextValue for Rect2<$scalar> {
                fn format_text(&self) -> String {
                    format_components(&<[$scalar; 4]>::from(*self))
                }

                fn parse_text(text: &str) -> Option<Self> {
                    parse_components::<$scalar, 4>(text).map(Self::from)
                }
            }

            impl BinaryValue for Rect2<$scalar> {
                #[inline]
                fn encoded_len(&self) -> usize {
                    4 * size_of::<$scalar>()
                }

                fn encode(&self, out: &mut [u8]) -> Option<usize> {
                    encode_components(&<[$scalar; 4]>::from(*self), out)
                }

                fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
                    let (components, read) = decode_components::<$scalar, 4>(bytes)?;
                    Some((Self::from(components), read))
                }
            }

            impl ParamValue for Rect2<$scalar> {
                #[inline]
                fn to_param(&self) -> DataBlockParam {
                    DataBlockParam::$param(<$vec>::from(<[$scalar; 4]>::from(*self)))
                }

                fn from_param(param: &DataBlockParam) -> Option<Self> {
                    match param {
                        DataBlockParam::$param(v) => Some(Self::from(<[$scalar; 4]>::from(*v))),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_rect_codecs! {
    f32 => Vec4F, glam::Vec4;
    i32 => Vec4S, glam::IVec4;
}

crate::impl_meta_value!(
    Rect2F(string, binary, block, partial_eq),
    Rect2S(string, binary, block, partial_eq),
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::serialization::DataBlock;
    use crate::value::{MetaValue, ValueTraits};

    use super::*;

    #[test]
    fn text_form_is_comma_separated() {
        let rect = Rect2F::parse_text("1,2,3,4").unwrap();
        assert_eq!(rect, Rect2F::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(rect.format_text(), "1,2,3,4");
        assert_eq!(Rect2F::parse_text(&rect.format_text()), Some(rect));

        assert!(Rect2S::parse_text("1,2,3").is_none());
        assert!(Rect2S::parse_text("1,2,3,4,5").is_none());
        assert!(Rect2S::parse_text("1,2,x,4").is_none());
    }

    #[test]
    fn binary_is_four_components() {
        let rect = Rect2S::new(-1, 2, 30, 40);
        let mut buf = vec![0_u8; rect.encoded_len()];
        assert_eq!(buf.len(), 16);
        assert_eq!(rect.encode(&mut buf), Some(16));
        assert_eq!(&buf[..4], &(-1_i32).to_le_bytes());
        assert_eq!(Rect2S::decode(&buf), Some((rect, 16)));
        assert!(rect.encode(&mut buf[..15]).is_none());
    }

    #[test]
    fn meta_value_block() {
        assert!(Rect2F::TRAITS.contains(ValueTraits::STRING | ValueTraits::DATA_BLOCK));
        let rect = Rect2F::new(0.5, 0.0, 2.0, 1.0);
        let mut block = DataBlock::new("rect");
        assert!(rect.to_data_block(&mut block));
        assert_eq!(block.get_vec4f("value", glam::Vec4::ZERO), glam::Vec4::new(0.5, 0.0, 2.0, 1.0));
        assert_eq!(Rect2F::from_data_block(&block), Some(rect));
    }

    #[test]
    fn geometry() {
        let rect = Rect2S::from_min_max([1, 1], [4, 3]);
        assert_eq!(rect, Rect2S::new(1, 1, 3, 2));
        assert_eq!(rect.max(), [4, 3]);
        assert!(rect.contains([1, 1]));
        assert!(!rect.contains([4, 2]));
        assert!(!rect.is_empty());
        assert!(Rect2S::new(0, 0, 0, 5).is_empty());
    }
}
