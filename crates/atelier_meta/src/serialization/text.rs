//! Value to text conversion.
//!
//! Numbers use their shortest round-trip form, vectors and matrices are
//! comma separated components (`"1,2,3,4"`). Parsing tolerates whitespace
//! around each component but rejects a wrong component count.

use alloc::string::{String, ToString};

use glam::{BVec2, BVec3, BVec4, IVec2, IVec3, IVec4, Mat3, Mat4};
use glam::{UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

/// A value with a canonical text form.
pub trait TextValue: Sized {
    fn format_text(&self) -> String;

    /// Parses the canonical form. Returns `None` on malformed input.
    fn parse_text(text: &str) -> Option<Self>;
}

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_text_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TextValue for $ty {
                #[inline]
                fn format_text(&self) -> String {
                    self.to_string()
                }

                #[inline]
                fn parse_text(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }
        )*
    };
}

impl_text_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl TextValue for bool {
    fn format_text(&self) -> String {
        String::from(if *self { "true" } else { "false" })
    }

    /// Accepts `true`/`false` in any case, and `1`/`0`.
    fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == "1" || text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text == "0" || text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl TextValue for String {
    #[inline]
    fn format_text(&self) -> String {
        self.clone()
    }

    #[inline]
    fn parse_text(text: &str) -> Option<Self> {
        Some(String::from(text))
    }
}

// -----------------------------------------------------------------------------
// Components

/// Joins components with `,`.
pub fn format_components<T: TextValue>(components: &[T]) -> String {
    let mut out = String::new();
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&c.format_text());
    }
    out
}

/// Parses exactly `N` comma separated components.
pub fn parse_components<T, const N: usize>(text: &str) -> Option<[T; N]>
where
    T: TextValue + Copy + Default,
{
    let mut out = [T::default(); N];
    let mut parts = text.split(',');
    for slot in &mut out {
        *slot = T::parse_text(parts.next()?)?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(out),
    }
}

macro_rules! impl_text_vector {
    ($($ty:ty => [$scalar:ty; $n:literal]),* $(,)?) => {
        $(
            impl TextValue for $ty {
                fn format_text(&self) -> String {
                    format_components(&<[$scalar; $n]>::from(*self))
                }

                fn parse_text(text: &str) -> Option<Self> {
                    parse_components::<$scalar, $n>(text).map(<$ty>::from)
                }
            }
        )*
    };
}

impl_text_vector! {
    Vec2 => [f32; 2], Vec3 => [f32; 3], Vec4 => [f32; 4],
    IVec2 => [i32; 2], IVec3 => [i32; 3], IVec4 => [i32; 4],
    UVec2 => [u32; 2], UVec3 => [u32; 3], UVec4 => [u32; 4],
    BVec2 => [bool; 2], BVec3 => [bool; 3], BVec4 => [bool; 4],
}

impl TextValue for Mat3 {
    fn format_text(&self) -> String {
        format_components(&self.to_cols_array())
    }

    fn parse_text(text: &str) -> Option<Self> {
        parse_components::<f32, 9>(text).map(|cols| Mat3::from_cols_array(&cols))
    }
}

impl TextValue for Mat4 {
    fn format_text(&self) -> String {
        format_components(&self.to_cols_array())
    }

    fn parse_text(text: &str) -> Option<Self> {
        parse_components::<f32, 16>(text).map(|cols| Mat4::from_cols_array(&cols))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(42_i32.format_text(), "42");
        assert_eq!(i32::parse_text(" -7 "), Some(-7));
        assert_eq!(u8::parse_text("300"), None);
        assert_eq!(f32::parse_text("abc"), None);

        let x = 0.1_f32 + 0.2_f32;
        assert_eq!(f32::parse_text(&x.format_text()), Some(x));
    }

    #[test]
    fn booleans() {
        assert_eq!(true.format_text(), "true");
        assert_eq!(bool::parse_text("TRUE"), Some(true));
        assert_eq!(bool::parse_text("0"), Some(false));
        assert_eq!(bool::parse_text("yes"), None);
    }

    #[test]
    fn vectors_are_comma_separated() {
        let v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.format_text(), "1,2,3,4");
        assert_eq!(Vec4::parse_text("1, 2, 3, 4"), Some(v));
        assert_eq!(Vec4::parse_text("1,2,3"), None);
        assert_eq!(Vec4::parse_text("1,2,3,4,5"), None);
        assert_eq!(IVec2::parse_text("-1,x"), None);
        assert_eq!(BVec3::parse_text("1,false,true"), Some(BVec3::new(true, false, true)));
    }

    #[test]
    fn matrix_round_trip() {
        let m = Mat3::from_cols_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.5]);
        assert_eq!(Mat3::parse_text(&m.format_text()), Some(m));
        assert_eq!(Mat4::parse_text(&Mat4::IDENTITY.format_text()), Some(Mat4::IDENTITY));
    }
}
