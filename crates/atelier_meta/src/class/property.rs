use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::class::{ConstMetaInstance, MetaClass, MetaInstance, MetaObject};
use crate::identity::ClassUid;
use crate::serialization::DataBlock;
use crate::value::{MetaValue, ValueTraits};

/// One named, type-erased accessor pair of a class.
///
/// Every operation takes an instance view of any class that inherits from
/// the declaring class; the binding locates its own sub-object through the
/// view's casts. Fallible operations return `None` or `false` and leave the
/// instance untouched on failure.
///
/// The usual implementation is
/// [`GenericMetaProperty`](crate::class::GenericMetaProperty).
pub trait MetaProperty: Send + Sync + 'static {
    /// Name, unique within the declaring class.
    fn name(&self) -> &'static str;

    fn declaring_class_uid(&self) -> ClassUid;

    fn value_class_uid(&self) -> ClassUid;

    fn value_type_id(&self) -> TypeId;

    fn value_type_name(&self) -> &'static str;

    /// `size_of` the value type.
    fn value_size(&self) -> usize;

    fn value_traits(&self) -> ValueTraits;

    #[inline]
    fn is_vector(&self) -> bool {
        self.value_traits().contains(ValueTraits::VECTOR)
    }

    #[inline]
    fn is_shared_ptr(&self) -> bool {
        self.value_traits().contains(ValueTraits::SHARED_PTR)
    }

    #[inline]
    fn is_enum_class(&self) -> bool {
        self.value_traits().contains(ValueTraits::ENUM)
    }

    #[inline]
    fn has_operator_equals(&self) -> bool {
        self.value_traits().contains(ValueTraits::EQUALITY)
    }

    #[inline]
    fn is_data_block_serializable(&self) -> bool {
        self.value_traits().contains(ValueTraits::DATA_BLOCK)
    }

    /// Display strings of an enum class value, empty for other types.
    fn enum_class_values(&self) -> Vec<String>;

    /// The declared class of a reflected value or pointee.
    fn value_meta_class(&self) -> Option<&'static MetaClass>;

    /// The class of the current value, the pointee's most derived class
    /// for shared pointers.
    fn runtime_value_meta_class(&self, instance: ConstMetaInstance<'_>) -> Option<&'static MetaClass>;

    fn shared_ptr_pointee(&self, instance: ConstMetaInstance<'_>) -> Option<Arc<dyn MetaObject>>;

    fn vector_size(&self, instance: ConstMetaInstance<'_>) -> Option<usize>;

    /// Resizes a vector value, default constructing new elements.
    fn set_vector_size(&self, instance: &mut MetaInstance<'_>, len: usize) -> bool;

    fn vector_element_class_uid(&self) -> ClassUid;

    /// Compares the values of two instances.
    ///
    /// Always `false` when the value type has no equality, even for equal
    /// values.
    fn is_equal(&self, a: ConstMetaInstance<'_>, b: ConstMetaInstance<'_>) -> bool;

    /// Reads the value into `out`, which must be the value type or an
    /// `Option` of it.
    fn get_value(&self, instance: ConstMetaInstance<'_>, out: &mut dyn Any) -> bool;

    /// Writes the value from `value`, which must be the value type.
    fn set_value(&self, instance: &mut MetaInstance<'_>, value: &dyn Any) -> bool;

    /// Copies the value from `src` to `dest`.
    fn copy(&self, dest: &mut MetaInstance<'_>, src: ConstMetaInstance<'_>) -> bool;

    fn value_to_string(&self, instance: ConstMetaInstance<'_>) -> Option<String>;

    /// Parses `text` and writes the result.
    fn set_string(&self, instance: &mut MetaInstance<'_>, text: &str) -> bool;

    fn default_value_string(&self) -> Option<String>;

    fn serialization_size(&self, instance: ConstMetaInstance<'_>) -> Option<usize>;

    /// Writes the binary form to the front of `out`, returning the bytes written.
    fn serialize_to(&self, instance: ConstMetaInstance<'_>, out: &mut [u8]) -> Option<usize>;

    /// Reads the binary form, returning the bytes consumed.
    fn deserialize_from(&self, instance: &mut MetaInstance<'_>, bytes: &[u8]) -> Option<usize>;

    fn to_data_block(&self, instance: ConstMetaInstance<'_>, block: &mut DataBlock) -> bool;

    fn set_data_block(&self, instance: &mut MetaInstance<'_>, block: &DataBlock) -> bool;
}

impl dyn MetaProperty {
    /// `true` if the value type is `V`.
    #[inline]
    pub fn is<V: 'static>(&self) -> bool {
        self.value_type_id() == TypeId::of::<V>()
    }

    /// Typed [`get_value`](MetaProperty::get_value).
    pub fn get<V: MetaValue>(&self, instance: ConstMetaInstance<'_>) -> Option<V> {
        let mut out: Option<V> = None;
        if !self.get_value(instance, &mut out) {
            return None;
        }
        out
    }

    /// Typed [`set_value`](MetaProperty::set_value).
    #[inline]
    pub fn set<V: MetaValue>(&self, instance: &mut MetaInstance<'_>, value: V) -> bool {
        self.set_value(instance, &value)
    }
}

impl fmt::Debug for dyn MetaProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaProperty")
            .field("name", &self.name())
            .field("declaring_class_uid", &self.declaring_class_uid())
            .field("value_type", &self.value_type_name())
            .field("traits", &self.value_traits())
            .finish()
    }
}
