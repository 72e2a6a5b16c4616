#![expect(unsafe_code, reason = "Views are type-erased addresses checked against class type ids.")]

use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::ptr;

use atelier_ptr::{Address, AddressMut};

use crate::class::{MetaClass, MetaObject, MetaProperty, Reflected, SuperClassLink};

// -----------------------------------------------------------------------------
// Cast routes

/// How to reach `target` from a view.
enum CastRoute {
    /// Upcast along the path, starting at the current address.
    FromCurrent(Vec<SuperClassLink>),
    /// Upcast along the path, starting at the origin address.
    FromOrigin(Vec<SuperClassLink>),
}

fn upcast_route(class: &MetaClass, target: &MetaClass) -> Option<CastRoute> {
    class.inheritance_succession(target).map(CastRoute::FromCurrent)
}

fn dynamic_route(class: &MetaClass, origin: &MetaClass, target: &MetaClass) -> Option<CastRoute> {
    if let Some(route) = upcast_route(class, target) {
        return Some(route);
    }
    origin.inheritance_succession(target).map(CastRoute::FromOrigin)
}

// -----------------------------------------------------------------------------
// ConstMetaInstance

/// A shared view of an object through one of its classes.
///
/// The view remembers the object it was created from (the origin) and that
/// object's most derived class, so it can be cast back down as well as up.
#[derive(Copy, Clone)]
pub struct ConstMetaInstance<'a> {
    class: &'static MetaClass,
    address: Address<'a>,
    origin_class: &'static MetaClass,
    origin: Address<'a>,
}

impl<'a> ConstMetaInstance<'a> {
    /// Views `object` through its most derived class.
    pub fn new<T: MetaObject + ?Sized>(object: &'a T) -> Self {
        let class = object.object_meta_class();
        let address = Address::from_ref(object);
        Self {
            class,
            address,
            origin_class: class,
            origin: address,
        }
    }

    /// Creates a view from raw parts.
    ///
    /// # Safety
    ///
    /// `address` points to a live object of `class`'s type, valid for `'a`.
    pub unsafe fn from_raw(class: &'static MetaClass, address: Address<'a>) -> Self {
        Self {
            class,
            address,
            origin_class: class,
            origin: address,
        }
    }

    /// The class the view currently presents.
    #[inline(always)]
    pub fn meta_class(&self) -> &'static MetaClass {
        self.class
    }

    /// The most derived class of the viewed object.
    #[inline(always)]
    pub fn origin_meta_class(&self) -> &'static MetaClass {
        self.origin_class
    }

    #[inline(always)]
    pub fn address(&self) -> Address<'a> {
        self.address
    }

    #[inline(always)]
    pub fn origin_address(&self) -> Address<'a> {
        self.origin
    }

    fn follow(self, target: &'static MetaClass, route: CastRoute) -> Self {
        let (start, path) = match route {
            CastRoute::FromCurrent(path) => (self.address, path),
            CastRoute::FromOrigin(path) => (self.origin, path),
        };
        let address = path.iter().fold(start, |address, link| {
            // SAFETY: Each link starts at the class the previous one ended at.
            unsafe { link.upcast_address(address) }
        });
        Self {
            class: target,
            address,
            ..self
        }
    }

    /// Views the object as `target`, which must be the current class or one
    /// of its ancestors.
    pub fn upcast_to(self, target: &'static MetaClass) -> Option<Self> {
        let route = upcast_route(self.class, target)?;
        Some(self.follow(target, route))
    }

    /// Views the object as `target`, searching up from the current class
    /// and then from the origin class.
    pub fn cast_to(self, target: &'static MetaClass) -> Option<Self> {
        if ptr::eq(self.class, target) {
            return Some(self);
        }
        let route = dynamic_route(self.class, self.origin_class, target)?;
        Some(self.follow(target, route))
    }

    /// Returns the object as `T` if `T` is the current class or an ancestor.
    pub fn static_cast<T: Reflected>(self) -> Option<&'a T> {
        self.upcast_to(T::meta_class())?.downcast_ref()
    }

    /// Returns the object as `T` if `T` is an ancestor of either the
    /// current class or the origin class.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_meta::class::{ConstMetaInstance, Reflected};
    /// use atelier_meta::impl_meta_class;
    ///
    /// #[derive(Default)]
    /// struct Base { value: i32 }
    ///
    /// #[derive(Default)]
    /// struct Derived { base: Base, name: String }
    ///
    /// impl_meta_class!(Base { "value": i32 => |s| s.value, |s, v| s.value = v; });
    /// impl_meta_class!(Derived: Base(base) {
    ///     "name": String => |s| s.name.clone(), |s, v| s.name = v;
    /// });
    ///
    /// let object = Derived::default();
    /// let as_base = ConstMetaInstance::new(&object).cast_to(Base::meta_class()).unwrap();
    /// let back: &Derived = as_base.dynamic_cast().unwrap();
    /// assert!(core::ptr::eq(back, &object));
    /// ```
    pub fn dynamic_cast<T: Reflected>(self) -> Option<&'a T> {
        self.cast_to(T::meta_class())?.downcast_ref()
    }

    /// Reads the address as `T` without any adjustment.
    ///
    /// # Safety
    ///
    /// The current address must point to a live `T`.
    #[inline]
    pub unsafe fn reinterpret_cast<T>(self) -> &'a T {
        // SAFETY: Guaranteed by the caller.
        unsafe { self.address.deref() }
    }

    /// Finds a property of the current class or its ancestors.
    #[inline]
    pub fn property(&self, name: &str) -> Option<&'static dyn MetaProperty> {
        self.class.property_by_name(name, true)
    }

    fn downcast_ref<T: 'static>(self) -> Option<&'a T> {
        if self.class.type_id() != TypeId::of::<T>() {
            return None;
        }
        // SAFETY: The class describes `T` and the address points to it.
        Some(unsafe { self.address.deref() })
    }
}

impl fmt::Debug for ConstMetaInstance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstMetaInstance")
            .field("class", &self.class.name())
            .field("address", &self.address)
            .field("origin_class", &self.origin_class.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MetaInstance

/// An exclusive view of an object through one of its classes.
///
/// See [`ConstMetaInstance`]. Use [`reborrow`](Self::reborrow) to cast
/// without giving the view away.
pub struct MetaInstance<'a> {
    class: &'static MetaClass,
    address: AddressMut<'a>,
    origin_class: &'static MetaClass,
    origin: AddressMut<'a>,
}

impl<'a> MetaInstance<'a> {
    /// Views `object` through its most derived class.
    pub fn new<T: MetaObject + ?Sized>(object: &'a mut T) -> Self {
        let class = object.object_meta_class();
        let address = AddressMut::from_mut(object);
        // SAFETY: The view only dereferences the origin after giving up the
        // current address.
        let origin = unsafe { duplicate(&address) };
        Self {
            class,
            address,
            origin_class: class,
            origin,
        }
    }

    /// Creates a view from raw parts.
    ///
    /// # Safety
    ///
    /// `address` points to a live object of `class`'s type, exclusively
    /// borrowed for `'a`.
    pub unsafe fn from_raw(class: &'static MetaClass, address: AddressMut<'a>) -> Self {
        // SAFETY: See `new`.
        let origin = unsafe { duplicate(&address) };
        Self {
            class,
            address,
            origin_class: class,
            origin,
        }
    }

    #[inline(always)]
    pub fn meta_class(&self) -> &'static MetaClass {
        self.class
    }

    #[inline(always)]
    pub fn origin_meta_class(&self) -> &'static MetaClass {
        self.origin_class
    }

    #[inline]
    pub fn as_const(&self) -> ConstMetaInstance<'_> {
        ConstMetaInstance {
            class: self.class,
            address: self.address.as_const(),
            origin_class: self.origin_class,
            origin: self.origin.as_const(),
        }
    }

    #[inline]
    pub fn into_const(self) -> ConstMetaInstance<'a> {
        ConstMetaInstance {
            class: self.class,
            address: self.address.into_const(),
            origin_class: self.origin_class,
            origin: self.origin.into_const(),
        }
    }

    #[inline]
    pub fn reborrow(&mut self) -> MetaInstance<'_> {
        MetaInstance {
            class: self.class,
            address: self.address.reborrow(),
            origin_class: self.origin_class,
            origin: self.origin.reborrow(),
        }
    }

    #[inline]
    pub fn address(&self) -> Address<'_> {
        self.address.as_const()
    }

    #[inline]
    pub fn address_mut(&mut self) -> AddressMut<'_> {
        self.address.reborrow()
    }

    fn follow(self, target: &'static MetaClass, route: CastRoute) -> Self {
        let Self {
            address,
            origin_class,
            origin,
            ..
        } = self;
        let (start, path) = match route {
            CastRoute::FromCurrent(path) => (address, path),
            // SAFETY: The origin stays in the view, the copy replaces the
            // current address which is dropped here.
            CastRoute::FromOrigin(path) => (unsafe { duplicate(&origin) }, path),
        };
        let address = path.iter().fold(start, |address, link| {
            // SAFETY: Each link starts at the class the previous one ended at.
            unsafe { link.upcast_address_mut(address) }
        });
        Self {
            class: target,
            address,
            origin_class,
            origin,
        }
    }

    /// See [`ConstMetaInstance::upcast_to`].
    pub fn upcast_to(self, target: &'static MetaClass) -> Option<Self> {
        let route = upcast_route(self.class, target)?;
        Some(self.follow(target, route))
    }

    /// See [`ConstMetaInstance::cast_to`].
    pub fn cast_to(self, target: &'static MetaClass) -> Option<Self> {
        if ptr::eq(self.class, target) {
            return Some(self);
        }
        let route = dynamic_route(self.class, self.origin_class, target)?;
        Some(self.follow(target, route))
    }

    #[inline]
    pub fn static_cast<T: Reflected>(&self) -> Option<&T> {
        self.as_const().static_cast()
    }

    #[inline]
    pub fn dynamic_cast<T: Reflected>(&self) -> Option<&T> {
        self.as_const().dynamic_cast()
    }

    pub fn static_cast_mut<T: Reflected>(&mut self) -> Option<&mut T> {
        self.reborrow().upcast_to(T::meta_class())?.into_downcast_mut()
    }

    pub fn dynamic_cast_mut<T: Reflected>(&mut self) -> Option<&mut T> {
        self.reborrow().into_dynamic_cast()
    }

    /// Consumes the view, returning the object as `T`.
    pub fn into_dynamic_cast<T: Reflected>(self) -> Option<&'a mut T> {
        self.cast_to(T::meta_class())?.into_downcast_mut()
    }

    /// Reads the address as `T` without any adjustment.
    ///
    /// # Safety
    ///
    /// The current address must point to a live `T`.
    #[inline]
    pub unsafe fn reinterpret_cast_mut<T>(&mut self) -> &mut T {
        // SAFETY: Guaranteed by the caller.
        unsafe { self.address.as_mut() }
    }

    #[inline]
    pub fn property(&self, name: &str) -> Option<&'static dyn MetaProperty> {
        self.class.property_by_name(name, true)
    }

    fn into_downcast_mut<T: 'static>(self) -> Option<&'a mut T> {
        if self.class.type_id() != TypeId::of::<T>() {
            return None;
        }
        // SAFETY: The class describes `T` and the address points to it.
        Some(unsafe { self.address.consume() })
    }
}

/// Copies an exclusive address.
///
/// # Safety
///
/// Only one of the two copies may be dereferenced at a time.
unsafe fn duplicate<'a>(address: &AddressMut<'a>) -> AddressMut<'a> {
    // SAFETY: Same pointer, same lifetime; the caller rules out aliasing.
    unsafe { AddressMut::new(address.as_const().into()) }
}

impl fmt::Debug for MetaInstance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaInstance")
            .field("class", &self.class.name())
            .field("address", &self.address)
            .field("origin_class", &self.origin_class.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::class::Reflected;
    use crate::impl_meta_class;

    use super::*;

    #[derive(Default)]
    struct Shape {
        sides: u32,
    }

    #[derive(Default)]
    struct Tagged {
        tag: String,
    }

    #[derive(Default)]
    struct Square {
        shape: Shape,
        size: f32,
        tagged: Tagged,
    }

    #[derive(Default)]
    struct Unrelated {
        flag: bool,
    }

    impl_meta_class!(Shape {
        "sides": u32 => |s| s.sides, |s, v| s.sides = v;
    });
    impl_meta_class!(Tagged {
        "tag": String => |s| s.tag.clone(), |s, v| s.tag = v;
    });
    impl_meta_class!(Square: Shape(shape), Tagged(tagged) {
        "size": f32 => |s| s.size, |s, v| s.size = v;
    });
    impl_meta_class!(Unrelated {
        "flag": bool => |s| s.flag, |s, v| s.flag = v;
    });

    fn square() -> Square {
        Square {
            shape: Shape { sides: 4 },
            size: 2.0,
            tagged: Tagged { tag: "sq".into() },
        }
    }

    #[test]
    fn new_view_is_most_derived() {
        let object = square();
        let instance = ConstMetaInstance::new(&object);
        assert!(ptr::eq(instance.meta_class(), Square::meta_class()));
        assert!(ptr::eq(instance.origin_meta_class(), Square::meta_class()));
        assert_eq!(instance.address(), Address::from_ref(&object));
        assert!(ptr::eq(instance.dynamic_cast::<Square>().unwrap(), &object));
    }

    #[test]
    fn upcast_applies_offset() {
        let object = square();
        let instance = ConstMetaInstance::new(&object);

        let tagged = instance.static_cast::<Tagged>().unwrap();
        assert!(ptr::eq(tagged, &object.tagged));
        let shape = instance.dynamic_cast::<Shape>().unwrap();
        assert!(ptr::eq(shape, &object.shape));

        let view = instance.upcast_to(Tagged::meta_class()).unwrap();
        assert_eq!(view.address(), Address::from_ref(&object.tagged));
        assert_eq!(view.origin_address(), Address::from_ref(&object));
    }

    #[test]
    fn dynamic_cast_returns_to_origin() {
        let object = square();
        let as_tagged = ConstMetaInstance::new(&object).cast_to(Tagged::meta_class()).unwrap();

        // Upcast only: `Square` is not an ancestor of `Tagged`.
        assert!(as_tagged.static_cast::<Square>().is_none());
        assert!(ptr::eq(as_tagged.dynamic_cast::<Square>().unwrap(), &object));
        // Sideways through the origin.
        assert!(ptr::eq(as_tagged.dynamic_cast::<Shape>().unwrap(), &object.shape));
        assert!(as_tagged.dynamic_cast::<Unrelated>().is_none());
    }

    #[test]
    fn properties_through_base_view() {
        let object = square();
        let as_shape = ConstMetaInstance::new(&object).cast_to(Shape::meta_class()).unwrap();

        // Only the current class and its ancestors are searched by name.
        assert!(as_shape.property("size").is_none());
        let sides = as_shape.property("sides").unwrap();
        assert_eq!(sides.get::<u32>(as_shape), Some(4));

        let size = Square::meta_class().property(0).unwrap();
        assert_eq!(size.get::<f32>(as_shape), Some(2.0));
    }

    #[test]
    fn mutable_casts() {
        let mut object = square();
        let mut instance = MetaInstance::new(&mut object);

        instance.dynamic_cast_mut::<Tagged>().unwrap().tag.push('!');
        instance.static_cast_mut::<Shape>().unwrap().sides = 5;
        assert!(instance.static_cast_mut::<Unrelated>().is_none());

        let tagged = instance.reborrow().cast_to(Tagged::meta_class()).unwrap();
        let square: &mut Square = tagged.into_dynamic_cast().unwrap();
        square.size = 3.0;

        let tag = Tagged::meta_class().property(0).unwrap();
        assert!(tag.set(&mut instance, String::from("new")));
        assert_eq!(instance.as_const().dynamic_cast::<Tagged>().unwrap().tag, "new");

        assert_eq!(object.shape.sides, 5);
        assert_eq!(object.size, 3.0);
        assert_eq!(object.tagged.tag, "new");
    }

    #[test]
    fn reinterpret_keeps_address() {
        let object = square();
        let instance = ConstMetaInstance::new(&object);
        let same: &Square = unsafe { instance.reinterpret_cast() };
        assert!(ptr::eq(same, &object));
    }

    #[test]
    fn dyn_object_view() {
        let boxed: alloc::boxed::Box<dyn MetaObject> = alloc::boxed::Box::new(square());
        let instance = ConstMetaInstance::new(&*boxed);
        assert!(ptr::eq(instance.meta_class(), Square::meta_class()));
        assert_eq!(instance.dynamic_cast::<Tagged>().unwrap().tag, "sq");
    }
}
