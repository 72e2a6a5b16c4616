//! Value to [`DataBlockParam`] conversion.

use alloc::string::String;

use glam::{BVec2, BVec3, BVec4, IVec2, IVec3, IVec4, Mat3, Mat4};
use glam::{UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use super::DataBlockParam;

/// A value stored as a single data block parameter.
pub trait ParamValue: Sized {
    fn to_param(&self) -> DataBlockParam;

    /// Reads the value back. Integer and float widths are converted when
    /// the stored number fits; any other type mismatch fails.
    fn from_param(param: &DataBlockParam) -> Option<Self>;
}

macro_rules! impl_param_signed {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                #[inline]
                fn to_param(&self) -> DataBlockParam {
                    DataBlockParam::$variant((*self).into())
                }

                #[inline]
                fn from_param(param: &DataBlockParam) -> Option<Self> {
                    <$ty>::try_from(param.as_i64()?).ok()
                }
            }
        )*
    };
}

macro_rules! impl_param_unsigned {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                #[inline]
                fn to_param(&self) -> DataBlockParam {
                    DataBlockParam::$variant((*self).into())
                }

                #[inline]
                fn from_param(param: &DataBlockParam) -> Option<Self> {
                    <$ty>::try_from(param.as_u64()?).ok()
                }
            }
        )*
    };
}

impl_param_signed!(i8 => S32, i16 => S32, i32 => S32, i64 => S64);
impl_param_unsigned!(u8 => U32, u16 => U32, u32 => U32, u64 => U64);

impl ParamValue for f32 {
    #[inline]
    fn to_param(&self) -> DataBlockParam {
        DataBlockParam::F32(*self)
    }

    #[inline]
    fn from_param(param: &DataBlockParam) -> Option<Self> {
        match *param {
            DataBlockParam::F32(v) => Some(v),
            DataBlockParam::F64(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl ParamValue for f64 {
    #[inline]
    fn to_param(&self) -> DataBlockParam {
        DataBlockParam::F64(*self)
    }

    #[inline]
    fn from_param(param: &DataBlockParam) -> Option<Self> {
        param.as_f64()
    }
}

impl ParamValue for bool {
    #[inline]
    fn to_param(&self) -> DataBlockParam {
        DataBlockParam::Bool(*self)
    }

    #[inline]
    fn from_param(param: &DataBlockParam) -> Option<Self> {
        param.as_bool()
    }
}

impl ParamValue for String {
    #[inline]
    fn to_param(&self) -> DataBlockParam {
        DataBlockParam::String(self.clone())
    }

    #[inline]
    fn from_param(param: &DataBlockParam) -> Option<Self> {
        param.as_str().map(String::from)
    }
}

macro_rules! impl_param_exact {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                #[inline]
                fn to_param(&self) -> DataBlockParam {
                    DataBlockParam::$variant(*self)
                }

                #[inline]
                fn from_param(param: &DataBlockParam) -> Option<Self> {
                    match param {
                        DataBlockParam::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_param_exact! {
    Vec2 => Vec2F, Vec3 => Vec3F, Vec4 => Vec4F,
    IVec2 => Vec2S, IVec3 => Vec3S, IVec4 => Vec4S,
    UVec2 => Vec2U, UVec3 => Vec3U, UVec4 => Vec4U,
    BVec2 => Vec2B, BVec3 => Vec3B, BVec4 => Vec4B,
    Mat3 => Mat3F, Mat4 => Mat4F,
}

// -----------------------------------------------------------------------------
// Tests
