//! A named tree of typed parameters.
//!
//! [`DataBlock`] is the structured serialization target of the reflection
//! layer. Each property maps to one parameter, or to one child block when
//! its value is itself structured. Insertion order is kept for both
//! parameters and child blocks.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use glam::{BVec2, BVec3, BVec4, IVec2, IVec3, IVec4, Mat3, Mat4};
use glam::{UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// DataBlockParam

/// The type tag of a [`DataBlockParam`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataBlockParamType {
    S32,
    S64,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Vec2S,
    Vec3S,
    Vec4S,
    Vec2U,
    Vec3U,
    Vec4U,
    Vec2F,
    Vec3F,
    Vec4F,
    Vec2B,
    Vec3B,
    Vec4B,
    Mat3F,
    Mat4F,
    String,
}

impl DataBlockParamType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::S32 => "S32",
            Self::S64 => "S64",
            Self::U32 => "U32",
            Self::U64 => "U64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::Bool => "Bool",
            Self::Vec2S => "Vec2S",
            Self::Vec3S => "Vec3S",
            Self::Vec4S => "Vec4S",
            Self::Vec2U => "Vec2U",
            Self::Vec3U => "Vec3U",
            Self::Vec4U => "Vec4U",
            Self::Vec2F => "Vec2F",
            Self::Vec3F => "Vec3F",
            Self::Vec4F => "Vec4F",
            Self::Vec2B => "Vec2B",
            Self::Vec3B => "Vec3B",
            Self::Vec4B => "Vec4B",
            Self::Mat3F => "Mat3F",
            Self::Mat4F => "Mat4F",
            Self::String => "String",
        }
    }
}

impl fmt::Display for DataBlockParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value stored in a [`DataBlock`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataBlockParam {
    S32(i32),
    S64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Vec2S(IVec2),
    Vec3S(IVec3),
    Vec4S(IVec4),
    Vec2U(UVec2),
    Vec3U(UVec3),
    Vec4U(UVec4),
    Vec2F(Vec2),
    Vec3F(Vec3),
    Vec4F(Vec4),
    Vec2B(BVec2),
    Vec3B(BVec3),
    Vec4B(BVec4),
    Mat3F(Mat3),
    Mat4F(Mat4),
    String(String),
}

impl DataBlockParam {
    pub const fn param_type(&self) -> DataBlockParamType {
        match self {
            Self::S32(_) => DataBlockParamType::S32,
            Self::S64(_) => DataBlockParamType::S64,
            Self::U32(_) => DataBlockParamType::U32,
            Self::U64(_) => DataBlockParamType::U64,
            Self::F32(_) => DataBlockParamType::F32,
            Self::F64(_) => DataBlockParamType::F64,
            Self::Bool(_) => DataBlockParamType::Bool,
            Self::Vec2S(_) => DataBlockParamType::Vec2S,
            Self::Vec3S(_) => DataBlockParamType::Vec3S,
            Self::Vec4S(_) => DataBlockParamType::Vec4S,
            Self::Vec2U(_) => DataBlockParamType::Vec2U,
            Self::Vec3U(_) => DataBlockParamType::Vec3U,
            Self::Vec4U(_) => DataBlockParamType::Vec4U,
            Self::Vec2F(_) => DataBlockParamType::Vec2F,
            Self::Vec3F(_) => DataBlockParamType::Vec3F,
            Self::Vec4F(_) => DataBlockParamType::Vec4F,
            Self::Vec2B(_) => DataBlockParamType::Vec2B,
            Self::Vec3B(_) => DataBlockParamType::Vec3B,
            Self::Vec4B(_) => DataBlockParamType::Vec4B,
            Self::Mat3F(_) => DataBlockParamType::Mat3F,
            Self::Mat4F(_) => DataBlockParamType::Mat4F,
            Self::String(_) => DataBlockParamType::String,
        }
    }

    /// Reads any integer parameter as `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::S32(v) => Some(v as i64),
            Self::S64(v) => Some(v),
            Self::U32(v) => Some(v as i64),
            Self::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Reads any integer parameter as `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::S32(v) => u64::try_from(v).ok(),
            Self::S64(v) => u64::try_from(v).ok(),
            Self::U32(v) => Some(v as u64),
            Self::U64(v) => Some(v),
            _ => None,
        }
    }

    /// Reads any float parameter as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v as f64),
            Self::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// DataBlock

/// A named node holding ordered parameters and ordered child blocks.
///
/// Parameter names are unique within a block, child block names are not:
/// a list is stored as repeated children called `"item"`.
///
/// # Examples
///
/// ```
/// use atelier_meta::serialization::{DataBlock, DataBlockParam};
///
/// let mut root = DataBlock::new("settings");
/// root.set_param("volume", DataBlockParam::F32(0.5));
///
/// let video = root.add_new_data_block("video");
/// video.set_param("vsync", DataBlockParam::Bool(true));
///
/// assert_eq!(root.get_f32("volume", 1.0), 0.5);
/// assert!(root.get_data_block("video").unwrap().get_bool("vsync", false));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBlock {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<(String, DataBlockParam)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    blocks: Vec<DataBlock>,
}

impl DataBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            blocks: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns `true` if there are no parameters and no child blocks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.blocks.is_empty()
    }

    // -------------------------------------------------------------------------
    // Params

    #[inline]
    pub fn params_count(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> impl ExactSizeIterator<Item = (&str, &DataBlockParam)> {
        self.params.iter().map(|(name, param)| (name.as_str(), param))
    }

    pub fn find_param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|(n, _)| n == name)
    }

    pub fn get_param(&self, name: &str) -> Option<&DataBlockParam> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn param_at(&self, index: usize) -> Option<(&str, &DataBlockParam)> {
        self.params.get(index).map(|(n, p)| (n.as_str(), p))
    }

    /// Sets a parameter, replacing the value in place if the name exists.
    pub fn set_param(&mut self, name: &str, param: DataBlockParam) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = param,
            None => self.params.push((String::from(name), param)),
        }
    }

    /// Appends a parameter even if one with the same name exists.
    ///
    /// Used for list items, see [`params_named`](Self::params_named).
    pub fn add_param(&mut self, name: &str, param: DataBlockParam) {
        self.params.push((String::from(name), param));
    }

    /// All parameters called `name`, in insertion order.
    pub fn params_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DataBlockParam> {
        self.params
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn remove_param(&mut self, name: &str) -> Option<DataBlockParam> {
        let index = self.find_param_index(name)?;
        Some(self.params.remove(index).1)
    }

    pub fn clear_params(&mut self) {
        self.params.clear();
    }

    // -------------------------------------------------------------------------
    // Typed getters

    pub fn get_s32(&self, name: &str, default: i32) -> i32 {
        self.get_param(name)
            .and_then(DataBlockParam::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn get_s64(&self, name: &str, default: i64) -> i64 {
        self.get_param(name)
            .and_then(DataBlockParam::as_i64)
            .unwrap_or(default)
    }

    pub fn get_u32(&self, name: &str, default: u32) -> u32 {
        self.get_param(name)
            .and_then(DataBlockParam::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn get_u64(&self, name: &str, default: u64) -> u64 {
        self.get_param(name)
            .and_then(DataBlockParam::as_u64)
            .unwrap_or(default)
    }

    pub fn get_f32(&self, name: &str, default: f32) -> f32 {
        self.get_param(name)
            .and_then(DataBlockParam::as_f64)
            .map_or(default, |v| v as f32)
    }

    pub fn get_f64(&self, name: &str, default: f64) -> f64 {
        self.get_param(name)
            .and_then(DataBlockParam::as_f64)
            .unwrap_or(default)
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.get_param(name)
            .and_then(DataBlockParam::as_bool)
            .unwrap_or(default)
    }

    pub fn get_string<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get_param(name)
            .and_then(DataBlockParam::as_str)
            .unwrap_or(default)
    }

    pub fn get_vec2f(&self, name: &str, default: Vec2) -> Vec2 {
        match self.get_param(name) {
            Some(DataBlockParam::Vec2F(v)) => *v,
            _ => default,
        }
    }

    pub fn get_vec3f(&self, name: &str, default: Vec3) -> Vec3 {
        match self.get_param(name) {
            Some(DataBlockParam::Vec3F(v)) => *v,
            _ => default,
        }
    }

    pub fn get_vec4f(&self, name: &str, default: Vec4) -> Vec4 {
        match self.get_param(name) {
            Some(DataBlockParam::Vec4F(v)) => *v,
            _ => default,
        }
    }

    // -------------------------------------------------------------------------
    // Child blocks

    #[inline]
    pub fn data_blocks_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn data_blocks(&self) -> core::slice::Iter<'_, DataBlock> {
        self.blocks.iter()
    }

    pub fn data_blocks_mut(&mut self) -> core::slice::IterMut<'_, DataBlock> {
        self.blocks.iter_mut()
    }

    /// The first child block called `name`.
    pub fn get_data_block(&self, name: &str) -> Option<&DataBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn get_data_block_mut(&mut self, name: &str) -> Option<&mut DataBlock> {
        self.blocks.iter_mut().find(|b| b.name == name)
    }

    pub fn data_block_at(&self, index: usize) -> Option<&DataBlock> {
        self.blocks.get(index)
    }

    /// All child blocks called `name`, in insertion order.
    pub fn data_blocks_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DataBlock> {
        self.blocks.iter().filter(move |b| b.name == name)
    }

    /// Appends a child block and returns it.
    pub fn add_data_block(&mut self, block: DataBlock) -> &mut DataBlock {
        self.blocks.push(block);
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    /// Appends an empty child block called `name`.
    pub fn add_new_data_block(&mut self, name: &str) -> &mut DataBlock {
        self.add_data_block(DataBlock::new(name))
    }

    /// Returns the first child called `name`, creating it if missing.
    pub fn ensure_data_block(&mut self, name: &str) -> &mut DataBlock {
        match self.blocks.iter().position(|b| b.name == name) {
            Some(index) => &mut self.blocks[index],
            None => self.add_new_data_block(name),
        }
    }

    /// Removes the first child block called `name`.
    pub fn remove_data_block(&mut self, name: &str) -> Option<DataBlock> {
        let index = self.blocks.iter().position(|b| b.name == name)?;
        Some(self.blocks.remove(index))
    }

    pub fn clear_data_blocks(&mut self) {
        self.blocks.clear();
    }

    // -------------------------------------------------------------------------
    // Whole block

    /// Removes all parameters and child blocks, keeping the name.
    pub fn clear(&mut self) {
        self.params.clear();
        self.blocks.clear();
    }

    /// Replaces the contents with a copy of `other`'s, keeping the name.
    pub fn copy_from(&mut self, other: &DataBlock) {
        self.params.clone_from(&other.params);
        self.blocks.clone_from(&other.blocks);
    }

    /// Returns the single `"value"` parameter if that is all the block holds.
    pub(crate) fn take_single_value(&mut self) -> Option<DataBlockParam> {
        if self.params.len() == 1 && self.blocks.is_empty() && self.params[0].0 == VALUE_PARAM {
            self.params.pop().map(|(_, p)| p)
        } else {
            None
        }
    }
}

/// The parameter name holding a scalar value.
pub const VALUE_PARAM: &str = "value";

/// The parameter or block name of a list element.
pub const ITEM_NAME: &str = "item";

/// The parameter naming the class of a shared pointee. Marks the pointer
/// as set even when the pointee has nothing else to write.
pub const CLASS_PARAM: &str = "@class";

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_order_and_replace_in_place() {
        let mut block = DataBlock::new("root");
        block.set_param("a", DataBlockParam::S32(1));
        block.set_param("b", DataBlockParam::Bool(true));
        block.set_param("a", DataBlockParam::S32(5));

        let names: Vec<&str> = block.params().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(block.get_s32("a", 0), 5);
        assert_eq!(block.find_param_index("b"), Some(1));
        assert_eq!(block.get_param("b").map(DataBlockParam::param_type), Some(DataBlockParamType::Bool));
    }

    #[test]
    fn typed_getters_fall_back_to_default() {
        let mut block = DataBlock::new("root");
        block.set_param("n", DataBlockParam::U64(u64::MAX));
        block.set_param("s", DataBlockParam::String("hello".into()));

        assert_eq!(block.get_s32("n", -1), -1);
        assert_eq!(block.get_u64("n", 0), u64::MAX);
        assert_eq!(block.get_string("s", ""), "hello");
        assert_eq!(block.get_string("missing", "fallback"), "fallback");
        assert_eq!(block.get_f32("s", 2.5), 2.5);
    }

    #[test]
    fn list_items_and_child_blocks() {
        let mut block = DataBlock::new("root");
        block.add_param(ITEM_NAME, DataBlockParam::S32(1));
        block.add_param(ITEM_NAME, DataBlockParam::S32(2));
        assert_eq!(block.params_named(ITEM_NAME).count(), 2);

        block.ensure_data_block("child").set_param("x", DataBlockParam::F32(1.0));
        block.ensure_data_block("child").set_param("y", DataBlockParam::F32(2.0));
        assert_eq!(block.data_blocks_count(), 1);
        assert_eq!(block.get_data_block("child").map(DataBlock::params_count), Some(2));

        let removed = block.remove_data_block("child");
        assert!(removed.is_some());
        assert!(block.get_data_block("child").is_none());
    }

    #[test]
    fn copy_and_clear_keep_name() {
        let mut src = DataBlock::new("src");
        src.set_param("v", DataBlockParam::Vec2F(Vec2::new(1.0, 2.0)));
        src.add_new_data_block("inner");

        let mut dst = DataBlock::new("dst");
        dst.copy_from(&src);
        assert_eq!(dst.name(), "dst");
        assert_eq!(dst.get_vec2f("v", Vec2::ZERO), Vec2::new(1.0, 2.0));
        assert_eq!(dst.data_blocks_count(), 1);

        dst.clear();
        assert!(dst.is_empty());
        assert_eq!(dst.name(), "dst");
    }

    #[test]
    fn serde_json_round_trip() {
        let mut block = DataBlock::new("root");
        block.set_param("pos", DataBlockParam::Vec3F(Vec3::new(1.0, -2.0, 0.5)));
        block.set_param("on", DataBlockParam::Vec2B(BVec2::new(true, false)));
        block
            .add_new_data_block("child")
            .set_param("name", DataBlockParam::String("leaf".into()));

        let json = serde_json::to_string(&block).unwrap();
        let back: DataBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn ron_round_trip() {
        let mut block = DataBlock::new("root");
        block.set_param("m", DataBlockParam::Mat3F(Mat3::IDENTITY));
        block.set_param("i", DataBlockParam::S64(-7));

        let text = ron::to_string(&block).unwrap();
        let back: DataBlock = ron::from_str(&text).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn single_value_detection() {
        let mut block = DataBlock::new("");
        block.set_param(VALUE_PARAM, DataBlockParam::S32(4));
        assert_eq!(block.take_single_value(), Some(DataBlockParam::S32(4)));

        let mut block = DataBlock::new("");
        block.add_param(ITEM_NAME, DataBlockParam::S32(4));
        assert_eq!(block.take_single_value(), None);
    }
}
