//! Vectors and shared-ownership pointers.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::class::{ConstMetaInstance, MetaClass, MetaInstance, MetaObject, Reflected};
use crate::identity::ClassUid;
use crate::registry::MetaRegistry;
use crate::serialization::{CLASS_PARAM, DataBlock, DataBlockParam, ITEM_NAME, VALUE_PARAM};
use crate::serialization::{binary, deserialize_meta_instance, serialize_meta_instance};
use crate::value::{MetaValue, ValueTraits};

// -----------------------------------------------------------------------------
// Vec

/// Elements are stored as repeated `"item"` parameters when every element
/// is a scalar, or as repeated `"item"` child blocks otherwise. A block
/// holding both shapes is rejected.
impl<T: MetaValue + Default> MetaValue for Vec<T> {
    const TRAITS: ValueTraits = ValueTraits::VECTOR.union(T::TRAITS.intersection(
        ValueTraits::BINARY
            .union(ValueTraits::DATA_BLOCK)
            .union(ValueTraits::EQUALITY),
    ));

    fn binary_size(&self) -> Option<usize> {
        self.iter()
            .try_fold(size_of::<u32>(), |acc, item| Some(acc + item.binary_size()?))
    }

    fn write_binary(&self, out: &mut [u8]) -> Option<usize> {
        let mut written = binary::encode_len(self.len(), out)?;
        for item in self {
            written += item.write_binary(out.get_mut(written..)?)?;
        }
        Some(written)
    }

    fn read_binary(bytes: &[u8]) -> Option<(Self, usize)> {
        let (len, mut read) = binary::decode_len(bytes)?;
        // Every element takes at least one byte, cap the reservation.
        let mut items = Vec::with_capacity(len.min(bytes.len()));
        for _ in 0..len {
            let (item, n) = T::read_binary(bytes.get(read..)?)?;
            items.push(item);
            read += n;
        }
        Some((items, read))
    }

    fn value_eq(&self, other: &Self) -> bool {
        T::TRAITS.contains(ValueTraits::EQUALITY)
            && self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a.value_eq(b))
    }

    fn to_data_block(&self, block: &mut DataBlock) -> bool {
        let mut item_blocks = Vec::with_capacity(self.len());
        for item in self {
            let mut item_block = DataBlock::new(ITEM_NAME);
            if !item.to_data_block(&mut item_block) {
                return false;
            }
            item_blocks.push(item_block);
        }

        let scalars = item_blocks.iter().all(|item| {
            item.params_count() == 1
                && item.data_blocks_count() == 0
                && item.get_param(VALUE_PARAM).is_some()
        });
        for mut item_block in item_blocks {
            match item_block.take_single_value().filter(|_| scalars) {
                Some(param) => block.add_param(ITEM_NAME, param),
                None => {
                    block.add_data_block(item_block);
                }
            }
        }
        true
    }

    fn from_data_block(block: &DataBlock) -> Option<Self> {
        if block.data_blocks_named(ITEM_NAME).next().is_some() {
            if block.params_named(ITEM_NAME).next().is_some() {
                log::warn!(
                    "List block `{}` holds both item parameters and item blocks.",
                    block.name()
                );
                return None;
            }
            return block.data_blocks_named(ITEM_NAME).map(T::from_data_block).collect();
        }

        block
            .params_named(ITEM_NAME)
            .map(|param| {
                let mut item_block = DataBlock::new(ITEM_NAME);
                item_block.set_param(VALUE_PARAM, param.clone());
                T::from_data_block(&item_block)
            })
            .collect()
    }

    #[inline]
    fn vector_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn set_vector_len(&mut self, len: usize) -> bool {
        self.resize_with(len, T::default);
        true
    }

    #[inline]
    fn vector_element_uid() -> ClassUid {
        ClassUid::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// Option<Arc<T>>

/// A shared pointer to a reflected object of a known class.
///
/// Equality compares pointer identity. The data block holds the pointee's
/// class name in [`CLASS_PARAM`] and its properties; an empty block stands
/// for `None`.
impl<T> MetaValue for Option<Arc<T>>
where
    T: Reflected + MetaObject + Default,
{
    const TRAITS: ValueTraits = ValueTraits::SHARED_PTR
        .union(ValueTraits::EQUALITY)
        .union(ValueTraits::DATA_BLOCK);

    fn value_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn to_data_block(&self, block: &mut DataBlock) -> bool {
        let Some(object) = self else {
            return true;
        };
        let name = T::meta_class().name();
        block.set_param(CLASS_PARAM, DataBlockParam::String(name.into()));
        serialize_meta_instance(ConstMetaInstance::new(&**object), block)
    }

    fn from_data_block(block: &DataBlock) -> Option<Self> {
        if block.is_empty() {
            return Some(None);
        }
        let expected = T::meta_class().name();
        if let Some(param) = block.get_param(CLASS_PARAM)
            && param.as_str() != Some(expected)
        {
            log::warn!("Block `{}` holds {param:?}, expected `{expected}`.", block.name());
            return None;
        }
        let mut object = T::default();
        if !deserialize_meta_instance(&mut MetaInstance::new(&mut object), block) {
            return None;
        }
        Some(Some(Arc::new(object)))
    }

    #[inline]
    fn value_meta_class() -> Option<&'static MetaClass> {
        Some(T::meta_class())
    }

    fn pointee(&self) -> Option<Arc<dyn MetaObject>> {
        self.clone().map(|object| object as Arc<dyn MetaObject>)
    }
}

// -----------------------------------------------------------------------------
// SharedObject

/// A shared pointer to a reflected object of any class.
///
/// The data block holds a single child block named after the pointee's
/// class; loading creates a new object of that class through the registry.
pub type SharedObject = Option<Arc<dyn MetaObject>>;

impl MetaValue for SharedObject {
    const TRAITS: ValueTraits = ValueTraits::SHARED_PTR
        .union(ValueTraits::EQUALITY)
        .union(ValueTraits::DATA_BLOCK);

    fn value_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn to_data_block(&self, block: &mut DataBlock) -> bool {
        let Some(object) = self else {
            return true;
        };
        let class = object.object_meta_class();
        let child = block.add_new_data_block(class.name());
        serialize_meta_instance(ConstMetaInstance::new(&**object), child)
    }

    fn from_data_block(block: &DataBlock) -> Option<Self> {
        let Some(child) = block.data_block_at(0) else {
            return Some(None);
        };
        let class = MetaRegistry::read().get_by_name(child.name())?;
        let mut object: Box<dyn MetaObject> = class.create_instance()?;
        if !deserialize_meta_instance(&mut MetaInstance::new(&mut *object), child) {
            return None;
        }
        Some(Some(Arc::from(object)))
    }

    fn runtime_meta_class(&self) -> Option<&'static MetaClass> {
        self.as_deref().map(MetaObject::object_meta_class)
    }

    #[inline]
    fn pointee(&self) -> Option<Arc<dyn MetaObject>> {
        self.clone()
    }
}

// -----------------------------------------------------------------------------
// Tests
