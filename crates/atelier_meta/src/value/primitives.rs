use alloc::string::String;

use glam::{BVec2, BVec3, BVec4, IVec2, IVec3, IVec4, Mat3, Mat4};
use glam::{UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use crate::impl_meta_value;

impl_meta_value! {
    bool(string, binary, block, partial_eq),
    i8(string, binary, block, partial_eq),
    i16(string, binary, block, partial_eq),
    i32(string, binary, block, partial_eq),
    i64(string, binary, block, partial_eq),
    u8(string, binary, block, partial_eq),
    u16(string, binary, block, partial_eq),
    u32(string, binary, block, partial_eq),
    u64(string, binary, block, partial_eq),
    f32(string, binary, block, partial_eq),
    f64(string, binary, block, partial_eq),
    String(string, binary, block, partial_eq),
}

impl_meta_value! {
    Vec2(string, binary, block, partial_eq),
    Vec3(string, binary, block, partial_eq),
    Vec4(string, binary, block, partial_eq),
    IVec2(string, binary, block, partial_eq),
    IVec3(string, binary, block, partial_eq),
    IVec4(string, binary, block, partial_eq),
    UVec2(string, binary, block, partial_eq),
    UVec3(string, binary, block, partial_eq),
    UVec4(string, binary, block, partial_eq),
    BVec2(string, binary, block, partial_eq),
    BVec3(string, binary, block, partial_eq),
    BVec4(string, binary, block, partial_eq),
    Mat3(string, binary, block, partial_eq),
    Mat4(string, binary, block, partial_eq),
}
