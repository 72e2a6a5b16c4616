use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::marker::PhantomData;

use crate::class::{ConstMetaInstance, MetaClass, MetaInstance, MetaObject, MetaProperty, Reflected};
use crate::identity::ClassUid;
use crate::serialization::DataBlock;
use crate::value::{MetaValue, ValueTraits};

/// A property of `T` with value type `V`, accessed through a getter and a
/// setter.
///
/// ```
/// use atelier_meta::class::{GenericMetaProperty, MetaClass, MetaClassCell, Reflected};
///
/// #[derive(Default)]
/// struct Light {
///     intensity: f32,
/// }
///
/// impl Reflected for Light {
///     fn meta_class() -> &'static MetaClass {
///         static CELL: MetaClassCell = MetaClassCell::new();
///         CELL.get_or_init(|| {
///             MetaClass::builder::<Light>("Light")
///                 .property(
///                     GenericMetaProperty::new("intensity", |l: &Light| l.intensity, |l, v| l.intensity = v)
///                         .with_default(|| 1.0),
///                 )
///                 .build()
///         })
///     }
/// }
///
/// let property = Light::meta_class().property(0).unwrap();
/// assert_eq!(property.default_value_string().as_deref(), Some("1"));
/// ```
pub struct GenericMetaProperty<T, V> {
    name: &'static str,
    getter: fn(&T) -> V,
    setter: fn(&mut T, V),
    default: Option<fn() -> V>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Reflected, V: MetaValue> GenericMetaProperty<T, V> {
    pub const fn new(name: &'static str, getter: fn(&T) -> V, setter: fn(&mut T, V)) -> Self {
        Self {
            name,
            getter,
            setter,
            default: None,
            _marker: PhantomData,
        }
    }

    /// Sets the value reported by [`default_value_string`](MetaProperty::default_value_string).
    pub fn with_default(mut self, default: fn() -> V) -> Self {
        self.default = Some(default);
        self
    }

    pub fn default_value(&self) -> Option<V> {
        self.default.map(|default| default())
    }

    #[inline]
    fn read(&self, instance: ConstMetaInstance<'_>) -> Option<V> {
        instance.dynamic_cast::<T>().map(self.getter)
    }

    #[inline]
    fn write(&self, instance: &mut MetaInstance<'_>, value: V) -> bool {
        match instance.dynamic_cast_mut::<T>() {
            Some(object) => {
                (self.setter)(object, value);
                true
            }
            None => false,
        }
    }
}

impl<T: Reflected, V: MetaValue> MetaProperty for GenericMetaProperty<T, V> {
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn declaring_class_uid(&self) -> ClassUid {
        ClassUid::of::<T>()
    }

    #[inline]
    fn value_class_uid(&self) -> ClassUid {
        ClassUid::of::<V>()
    }

    #[inline]
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<V>()
    }

    #[inline]
    fn value_type_name(&self) -> &'static str {
        core::any::type_name::<V>()
    }

    #[inline]
    fn value_size(&self) -> usize {
        size_of::<V>()
    }

    #[inline]
    fn value_traits(&self) -> ValueTraits {
        V::TRAITS
    }

    fn enum_class_values(&self) -> Vec<String> {
        V::enum_strings()
    }

    fn value_meta_class(&self) -> Option<&'static MetaClass> {
        V::value_meta_class()
    }

    fn runtime_value_meta_class(&self, instance: ConstMetaInstance<'_>) -> Option<&'static MetaClass> {
        self.read(instance)?.runtime_meta_class()
    }

    fn shared_ptr_pointee(&self, instance: ConstMetaInstance<'_>) -> Option<Arc<dyn MetaObject>> {
        self.read(instance)?.pointee()
    }

    fn vector_size(&self, instance: ConstMetaInstance<'_>) -> Option<usize> {
        self.read(instance)?.vector_len()
    }

    fn set_vector_size(&self, instance: &mut MetaInstance<'_>, len: usize) -> bool {
        let Some(mut value) = self.read(instance.as_const()) else {
            return false;
        };
        value.set_vector_len(len) && self.write(instance, value)
    }

    #[inline]
    fn vector_element_class_uid(&self) -> ClassUid {
        V::vector_element_uid()
    }

    fn is_equal(&self, a: ConstMetaInstance<'_>, b: ConstMetaInstance<'_>) -> bool {
        if !V::TRAITS.contains(ValueTraits::EQUALITY) {
            return false;
        }
        match (self.read(a), self.read(b)) {
            (Some(a), Some(b)) => a.value_eq(&b),
            _ => false,
        }
    }

    fn get_value(&self, instance: ConstMetaInstance<'_>, out: &mut dyn Any) -> bool {
        if let Some(slot) = out.downcast_mut::<V>() {
            return match self.read(instance) {
                Some(value) => {
                    *slot = value;
                    true
                }
                None => false,
            };
        }
        if let Some(slot) = out.downcast_mut::<Option<V>>() {
            *slot = self.read(instance);
            return slot.is_some();
        }
        false
    }

    fn set_value(&self, instance: &mut MetaInstance<'_>, value: &dyn Any) -> bool {
        match value.downcast_ref::<V>() {
            Some(value) => self.write(instance, value.clone()),
            None => false,
        }
    }

    fn copy(&self, dest: &mut MetaInstance<'_>, src: ConstMetaInstance<'_>) -> bool {
        match self.read(src) {
            Some(value) => self.write(dest, value),
            None => false,
        }
    }

    fn value_to_string(&self, instance: ConstMetaInstance<'_>) -> Option<String> {
        self.read(instance)?.to_value_string()
    }

    fn set_string(&self, instance: &mut MetaInstance<'_>, text: &str) -> bool {
        match V::from_value_str(text) {
            Some(value) => self.write(instance, value),
            None => false,
        }
    }

    fn default_value_string(&self) -> Option<String> {
        self.default_value()?.to_value_string()
    }

    fn serialization_size(&self, instance: ConstMetaInstance<'_>) -> Option<usize> {
        self.read(instance)?.binary_size()
    }

    fn serialize_to(&self, instance: ConstMetaInstance<'_>, out: &mut [u8]) -> Option<usize> {
        self.read(instance)?.write_binary(out)
    }

    fn deserialize_from(&self, instance: &mut MetaInstance<'_>, bytes: &[u8]) -> Option<usize> {
        let (value, read) = V::read_binary(bytes)?;
        self.write(instance, value).then_some(read)
    }

    fn to_data_block(&self, instance: ConstMetaInstance<'_>, block: &mut DataBlock) -> bool {
        match self.read(instance) {
            Some(value) => value.to_data_block(block),
            None => false,
        }
    }

    fn set_data_block(&self, instance: &mut MetaInstance<'_>, block: &DataBlock) -> bool {
        match V::from_data_block(block) {
            Some(value) => self.write(instance, value),
            None => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use core::ptr;

    use crate::class::{ConstMetaInstance, MetaInstance, Reflected};
    use crate::math::Rect2F;
    use crate::value::SharedObject;
    use crate::{impl_meta_class, meta_enum};

    use super::*;

    meta_enum! {
        pub enum Anchor {
            Left = 1,
            Center,
            Right,
        }
    }

    /// No equality, no text form.
    #[derive(Clone, Default)]
    struct Handle(u32);

    impl MetaValue for Handle {}

    #[derive(Default)]
    struct Panel {
        title: String,
        bounds: Rect2F,
        opacity: f32,
        anchor: Anchor,
        handle: Handle,
        children: Vec<u16>,
        owner: Option<Arc<Panel>>,
        any: SharedObject,
    }

    #[derive(Default)]
    struct Dialog {
        panel: Panel,
        modal: bool,
    }

    impl_meta_class!(Panel {
        "title": String => |s| s.title.clone(), |s, v| s.title = v, default String::from("Untitled");
        "bounds": Rect2F => |s| s.bounds, |s, v| s.bounds = v;
        "opacity": f32 => |s| s.opacity, |s, v| s.opacity = v, default 1.0;
        "anchor": Anchor => |s| s.anchor, |s, v| s.anchor = v;
        "handle": Handle => |s| s.handle.clone(), |s, v| s.handle = v;
        "children": Vec<u16> => |s| s.children.clone(), |s, v| s.children = v;
        "owner": Option<Arc<Panel>> => |s| s.owner.clone(), |s, v| s.owner = v;
        "any": SharedObject => |s| s.any.clone(), |s, v| s.any = v;
    });

    impl_meta_class!(Dialog: Panel(panel) {
        "modal": bool => |s| s.modal, |s, v| s.modal = v;
    });

    fn property(name: &str) -> &'static dyn MetaProperty {
        Panel::meta_class().property_by_name(name, false).unwrap()
    }

    #[test]
    fn typed_get_reports_failure_as_none() {
        let dialog = Dialog {
            panel: Panel {
                opacity: 0.25,
                ..Panel::default()
            },
            modal: true,
        };
        let view = ConstMetaInstance::new(&dialog);
        assert_eq!(property("opacity").get::<f32>(view), Some(0.25));
        assert_eq!(property("opacity").get::<f64>(view), None);
        assert_eq!(property("title").get::<u32>(view), None);
    }

    #[test]
    fn descriptors() {
        let title = property("title");
        assert_eq!(title.declaring_class_uid(), Panel::meta_class().uid());
        assert_eq!(title.value_class_uid(), ClassUid::of::<String>());
        assert_eq!(title.value_size(), size_of::<String>());
        assert!(title.is::<String>());
        assert!(title.has_operator_equals());
        assert!(!title.is_vector());

        assert!(property("children").is_vector());
        assert_eq!(property("children").vector_element_class_uid(), ClassUid::of::<u16>());
        assert!(property("owner").is_shared_ptr());
        assert!(property("anchor").is_enum_class());
        assert_eq!(property("anchor").enum_class_values(), ["Left", "Center", "Right"]);
        assert!(property("title").enum_class_values().is_empty());
        assert!(!property("handle").is_data_block_serializable());
    }

    #[test]
    fn get_set_round_trip() {
        let mut dialog = Dialog::default();
        let mut instance = MetaInstance::new(&mut dialog);

        let title = property("title");
        assert!(title.set(&mut instance, String::from("Open")));
        assert_eq!(title.get::<String>(instance.as_const()).as_deref(), Some("Open"));

        let opacity = property("opacity");
        assert!(opacity.set_value(&mut instance, &0.25_f32));
        let mut out = 0.0_f32;
        assert!(opacity.get_value(instance.as_const(), &mut out));
        assert_eq!(out, 0.25);

        // Wrong buffer types are rejected without writing.
        assert!(!opacity.set_value(&mut instance, &0.5_f64));
        let mut wrong = 0_i32;
        assert!(!opacity.get_value(instance.as_const(), &mut wrong));
        assert!(opacity.get::<f64>(instance.as_const()).is_none());

        assert_eq!(dialog.panel.title, "Open");
        assert_eq!(dialog.panel.opacity, 0.25);
    }

    #[test]
    fn string_round_trip() {
        let mut panel = Panel {
            bounds: Rect2F::new(1.0, 2.0, 3.0, 4.0),
            anchor: Anchor::Right,
            ..Default::default()
        };
        let mut instance = MetaInstance::new(&mut panel);

        let bounds = property("bounds");
        let text = bounds.value_to_string(instance.as_const()).unwrap();
        assert_eq!(text, "1,2,3,4");
        assert!(bounds.set_string(&mut instance, "5,6,7,8"));
        assert!(bounds.set_string(&mut instance, &text));

        let anchor = property("anchor");
        assert_eq!(anchor.value_to_string(instance.as_const()).as_deref(), Some("Right"));
        assert!(!anchor.set_string(&mut instance, "Top"));
        assert!(anchor.set_string(&mut instance, "Center"));

        // Malformed text leaves the value alone.
        let opacity = property("opacity");
        assert!(!opacity.set_string(&mut instance, "half"));
        assert!(property("handle").value_to_string(instance.as_const()).is_none());
        assert!(!property("handle").set_string(&mut instance, "1"));

        assert_eq!(panel.bounds, Rect2F::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(panel.anchor, Anchor::Center);
        assert_eq!(panel.opacity, 0.0);
    }

    #[test]
    fn default_strings() {
        assert_eq!(property("title").default_value_string().as_deref(), Some("Untitled"));
        assert_eq!(property("opacity").default_value_string().as_deref(), Some("1"));
        assert!(property("bounds").default_value_string().is_none());
    }

    #[test]
    fn equality_without_support_is_false() {
        let a = Panel::default();
        let b = Panel::default();
        let (a, b) = (ConstMetaInstance::new(&a), ConstMetaInstance::new(&b));

        assert!(property("title").is_equal(a, b));
        assert!(property("children").is_equal(a, b));
        // Both handles are `Handle(0)`, yet cannot be compared.
        assert!(!property("handle").has_operator_equals());
        assert!(!property("handle").is_equal(a, b));
    }

    #[test]
    fn copy_between_instances() {
        let src = Dialog {
            panel: Panel {
                title: "Source".into(),
                ..Default::default()
            },
            modal: true,
        };
        let mut dest = Panel::default();

        let title = property("title");
        assert!(title.copy(&mut MetaInstance::new(&mut dest), ConstMetaInstance::new(&src)));
        assert_eq!(dest.title, "Source");

        let modal = Dialog::meta_class().property(0).unwrap();
        assert!(!modal.copy(&mut MetaInstance::new(&mut dest), ConstMetaInstance::new(&src)));
    }

    #[test]
    fn binary_snapshot() {
        let mut panel = Panel {
            title: "abc".into(),
            children: vec![1, 2, 3],
            ..Default::default()
        };
        let instance = ConstMetaInstance::new(&panel);

        let title = property("title");
        let size = title.serialization_size(instance).unwrap();
        assert_eq!(size, 4 + 3);
        let mut buf = vec![0_u8; size];
        assert_eq!(title.serialize_to(instance, &mut buf), Some(size));
        assert!(title.serialize_to(instance, &mut buf[..size - 1]).is_none());

        let children = property("children");
        let mut list = vec![0_u8; children.serialization_size(instance).unwrap()];
        assert_eq!(list.len(), 4 + 3 * 2);
        children.serialize_to(instance, &mut list).unwrap();
        assert!(property("handle").serialization_size(instance).is_none());

        let mut loaded = Panel::default();
        let mut target = MetaInstance::new(&mut loaded);
        assert_eq!(title.deserialize_from(&mut target, &buf), Some(size));
        assert_eq!(children.deserialize_from(&mut target, &list), Some(list.len()));
        assert!(title.deserialize_from(&mut target, &buf[..2]).is_none());
        assert_eq!(loaded.title, "abc");
        assert_eq!(loaded.children, [1, 2, 3]);

        panel.title.clear();
        assert_eq!(title.serialization_size(ConstMetaInstance::new(&panel)), Some(4));
    }

    #[test]
    fn vector_size() {
        let mut panel = Panel {
            children: vec![7],
            ..Default::default()
        };
        let mut instance = MetaInstance::new(&mut panel);
        let children = property("children");

        assert_eq!(children.vector_size(instance.as_const()), Some(1));
        assert!(children.set_vector_size(&mut instance, 3));
        assert_eq!(children.vector_size(instance.as_const()), Some(3));
        assert!(property("title").vector_size(instance.as_const()).is_none());
        assert!(!property("title").set_vector_size(&mut instance, 2));
        assert_eq!(panel.children, [7, 0, 0]);
    }

    #[test]
    fn shared_pointers() {
        let owner = Arc::new(Panel {
            title: "owner".into(),
            ..Default::default()
        });
        let dialog: Arc<dyn MetaObject> = Arc::new(Dialog::default());
        let panel = Panel {
            owner: Some(owner.clone()),
            any: Some(dialog.clone()),
            ..Default::default()
        };
        let instance = ConstMetaInstance::new(&panel);

        let owner_property = property("owner");
        assert!(ptr::eq(owner_property.value_meta_class().unwrap(), Panel::meta_class()));
        let pointee = owner_property.shared_ptr_pointee(instance).unwrap();
        assert!(ptr::addr_eq(Arc::as_ptr(&pointee), Arc::as_ptr(&owner)));

        let any = property("any");
        assert!(any.value_meta_class().is_none());
        let runtime = any.runtime_value_meta_class(instance).unwrap();
        assert!(ptr::eq(runtime, Dialog::meta_class()));
        let pointee = any.shared_ptr_pointee(instance).unwrap();
        let modal = ConstMetaInstance::new(&*pointee).property("modal").unwrap();
        assert_eq!(modal.get::<bool>(ConstMetaInstance::new(&*pointee)), Some(false));

        assert!(property("title").shared_ptr_pointee(instance).is_none());
        let other = Panel {
            owner: Some(owner),
            ..Default::default()
        };
        assert!(owner_property.is_equal(instance, ConstMetaInstance::new(&other)));
        assert!(!any.is_equal(instance, ConstMetaInstance::new(&other)));
    }

    #[test]
    fn data_block_per_property() {
        let mut panel = Panel {
            opacity: 0.5,
            ..Default::default()
        };
        let opacity = property("opacity");
        let mut block = DataBlock::new("opacity");
        assert!(opacity.to_data_block(ConstMetaInstance::new(&panel), &mut block));
        assert_eq!(block.get_f32("value", 0.0), 0.5);

        block.set_param("value", crate::serialization::DataBlockParam::F32(0.75));
        assert!(opacity.set_data_block(&mut MetaInstance::new(&mut panel), &block));
        assert_eq!(panel.opacity, 0.75);

        let mut handle = DataBlock::new("handle");
        assert!(!property("handle").to_data_block(ConstMetaInstance::new(&panel), &mut handle));
        assert!(!property("handle").set_data_block(&mut MetaInstance::new(&mut panel), &handle));
    }
}
