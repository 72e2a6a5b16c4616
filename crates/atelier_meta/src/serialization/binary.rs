//! Fixed layout little-endian value encoding.
//!
//! Scalars are written in their native width, `bool` as one byte, vectors
//! and matrices as consecutive components. Strings and lists carry a `u32`
//! length prefix.

use alloc::string::String;

use glam::{BVec2, BVec3, BVec4, IVec2, IVec3, IVec4, Mat3, Mat4};
use glam::{UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

/// A value with a binary encoding.
pub trait BinaryValue: Sized {
    /// The number of bytes [`encode`](Self::encode) writes.
    fn encoded_len(&self) -> usize;

    /// Writes the value to the front of `out`, returning the bytes written.
    ///
    /// Returns `None`, leaving the contents unspecified, if `out` is too short.
    fn encode(&self, out: &mut [u8]) -> Option<usize>;

    /// Reads a value from the front of `bytes`, returning it and the bytes read.
    fn decode(bytes: &[u8]) -> Option<(Self, usize)>;
}

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_binary_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BinaryValue for $ty {
                #[inline]
                fn encoded_len(&self) -> usize {
                    size_of::<$ty>()
                }

                #[inline]
                fn encode(&self, out: &mut [u8]) -> Option<usize> {
                    const N: usize = size_of::<$ty>();
                    out.get_mut(..N)?.copy_from_slice(&self.to_le_bytes());
                    Some(N)
                }

                #[inline]
                fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
                    const N: usize = size_of::<$ty>();
                    let raw: [u8; N] = bytes.get(..N)?.try_into().ok()?;
                    Some((<$ty>::from_le_bytes(raw), N))
                }
            }
        )*
    };
}

impl_binary_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl BinaryValue for bool {
    #[inline]
    fn encoded_len(&self) -> usize {
        1
    }

    fn encode(&self, out: &mut [u8]) -> Option<usize> {
        *out.first_mut()? = *self as u8;
        Some(1)
    }

    fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
        match *bytes.first()? {
            0 => Some((false, 1)),
            1 => Some((true, 1)),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Length prefix

/// Writes a `u32` length prefix.
pub fn encode_len(len: usize, out: &mut [u8]) -> Option<usize> {
    u32::try_from(len).ok()?.encode(out)
}

/// Reads a `u32` length prefix.
pub fn decode_len(bytes: &[u8]) -> Option<(usize, usize)> {
    let (len, read) = u32::decode(bytes)?;
    Some((len as usize, read))
}

impl BinaryValue for String {
    #[inline]
    fn encoded_len(&self) -> usize {
        size_of::<u32>() + self.len()
    }

    fn encode(&self, out: &mut [u8]) -> Option<usize> {
        let head = encode_len(self.len(), out)?;
        let end = head + self.len();
        out.get_mut(head..end)?.copy_from_slice(self.as_bytes());
        Some(end)
    }

    fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
        let (len, head) = decode_len(bytes)?;
        let end = head.checked_add(len)?;
        let text = core::str::from_utf8(bytes.get(head..end)?).ok()?;
        Some((String::from(text), end))
    }
}

// -----------------------------------------------------------------------------
// Components

/// Writes each component in order.
pub fn encode_components<T: BinaryValue>(components: &[T], out: &mut [u8]) -> Option<usize> {
    let mut written = 0;
    for c in components {
        written += c.encode(out.get_mut(written..)?)?;
    }
    Some(written)
}

/// Reads exactly `N` components.
pub fn decode_components<T, const N: usize>(bytes: &[u8]) -> Option<([T; N], usize)>
where
    T: BinaryValue + Copy + Default,
{
    let mut out = [T::default(); N];
    let mut read = 0;
    for slot in &mut out {
        let (value, n) = T::decode(bytes.get(read..)?)?;
        *slot = value;
        read += n;
    }
    Some((out, read))
}

macro_rules! impl_binary_vector {
    ($($ty:ty => [$scalar:ty; $n:literal]),* $(,)?) => {
        $(
            impl BinaryValue for $ty {
                #[inline]
                fn encoded_len(&self) -> usize {
                    $n * size_of::<$scalar>()
                }

                fn encode(&self, out: &mut [u8]) -> Option<usize> {
                    encode_components(&<[$scalar; $n]>::from(*self), out)
                }

                fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
                    let (components, read) = decode_components::<$scalar, $n>(bytes)?;
                    Some((<$ty>::from(components), read))
                }
            }
        )*
    };
}

impl_binary_vector! {
    Vec2 => [f32; 2], Vec3 => [f32; 3], Vec4 => [f32; 4],
    IVec2 => [i32; 2], IVec3 => [i32; 3], IVec4 => [i32; 4],
    UVec2 => [u32; 2], UVec3 => [u32; 3], UVec4 => [u32; 4],
    BVec2 => [bool; 2], BVec3 => [bool; 3], BVec4 => [bool; 4],
}

impl BinaryValue for Mat3 {
    #[inline]
    fn encoded_len(&self) -> usize {
        9 * size_of::<f32>()
    }

    fn encode(&self, out: &mut [u8]) -> Option<usize> {
        encode_components(&self.to_cols_array(), out)
    }

    fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
        let (cols, read) = decode_components::<f32, 9>(bytes)?;
        Some((Mat3::from_cols_array(&cols), read))
    }
}

impl BinaryValue for Mat4 {
    #[inline]
    fn encoded_len(&self) -> usize {
        16 * size_of::<f32>()
    }

    fn encode(&self, out: &mut [u8]) -> Option<usize> {
        encode_components(&self.to_cols_array(), out)
    }

    fn decode(bytes: &[u8]) -> Option<(Self, usize)> {
        let (cols, read) = decode_components::<f32, 16>(bytes)?;
        Some((Mat4::from_cols_array(&cols), read))
    }
}

// -----------------------------------------------------------------------------
// Tests
