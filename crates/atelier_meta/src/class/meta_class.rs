use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::ptr;
use std::sync::OnceLock;

use atelier_ptr::{Address, AddressMut};

use crate::class::{MetaObject, MetaProperty, Reflected};
use crate::identity::{ClassIdentity, ClassUid};
use crate::registry::MetaRegistry;

// -----------------------------------------------------------------------------
// SuperClassLink

/// A link from a class to one of its direct super classes.
///
/// Inheritance is modelled by embedding: the derived type holds a value of
/// the super type at a fixed byte offset. Upcasting an address adds the
/// offset, downcasting subtracts it.
#[derive(Copy, Clone)]
pub struct SuperClassLink {
    class: &'static MetaClass,
    derived: TypeId,
    offset: usize,
}

impl SuperClassLink {
    /// Creates a link from `Derived` to an embedded `Super` at `offset`.
    ///
    /// # Safety
    ///
    /// `offset` must be the byte offset of a field of type `Super` inside
    /// `Derived`, as given by [`core::mem::offset_of!`].
    #[expect(unsafe_code, reason = "Every cast through the link trusts the offset.")]
    pub unsafe fn new<Derived: 'static, Super: Reflected>(offset: usize) -> Self {
        debug_assert!(
            offset + size_of::<Super>() <= size_of::<Derived>(),
            "super class `{}` at offset {offset} does not fit in `{}`",
            core::any::type_name::<Super>(),
            core::any::type_name::<Derived>(),
        );
        Self {
            class: Super::meta_class(),
            derived: TypeId::of::<Derived>(),
            offset,
        }
    }

    /// The super class.
    #[inline(always)]
    pub fn meta_class(&self) -> &'static MetaClass {
        self.class
    }

    /// Byte offset of the super object inside the derived one.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Derived address to super address.
    ///
    /// # Safety
    ///
    /// `address` points to a live object of the derived class.
    #[inline]
    #[expect(unsafe_code, reason = "Raw address arithmetic.")]
    pub unsafe fn upcast_address<'a>(&self, address: Address<'a>) -> Address<'a> {
        // SAFETY: The super object lies inside the derived one.
        unsafe { address.byte_add(self.offset) }
    }

    /// Super address to derived address.
    ///
    /// # Safety
    ///
    /// `address` points to the super object embedded in a live derived
    /// object, and was itself derived from an address of that object.
    #[inline]
    #[expect(unsafe_code, reason = "Raw address arithmetic.")]
    pub unsafe fn downcast_address<'a>(&self, address: Address<'a>) -> Address<'a> {
        // SAFETY: The caller guarantees the containing object.
        unsafe { address.byte_sub(self.offset) }
    }

    /// See [`upcast_address`](Self::upcast_address).
    ///
    /// # Safety
    ///
    /// `address` points to a live object of the derived class.
    #[inline]
    #[expect(unsafe_code, reason = "Raw address arithmetic.")]
    pub unsafe fn upcast_address_mut<'a>(&self, address: AddressMut<'a>) -> AddressMut<'a> {
        // SAFETY: The super object lies inside the derived one.
        unsafe { address.byte_add(self.offset) }
    }

    /// See [`downcast_address`](Self::downcast_address).
    ///
    /// # Safety
    ///
    /// Same as [`downcast_address`](Self::downcast_address).
    #[inline]
    #[expect(unsafe_code, reason = "Raw address arithmetic.")]
    pub unsafe fn downcast_address_mut<'a>(&self, address: AddressMut<'a>) -> AddressMut<'a> {
        // SAFETY: The caller guarantees the containing object.
        unsafe { address.byte_sub(self.offset) }
    }
}

impl fmt::Debug for SuperClassLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperClassLink")
            .field("class", &self.class.name())
            .field("offset", &self.offset)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MetaClass

/// The runtime descriptor of one reflected type.
///
/// Holds the type's identity, its own properties in declaration order, and
/// links to its direct super classes. The transitive closure of super
/// classes is computed once at construction.
///
/// Classes live for the whole process and are compared by address.
pub struct MetaClass {
    identity: ClassIdentity,
    type_id: TypeId,
    type_name: &'static str,
    properties: Box<[Box<dyn MetaProperty>]>,
    supers: Box<[SuperClassLink]>,
    // Strict ancestors, depth first, first discovery wins.
    ancestors: Box<[&'static MetaClass]>,
    multiple_inheritance: bool,
    constructor: Option<fn() -> Box<dyn MetaObject>>,
}

impl MetaClass {
    /// Starts describing type `T`, displayed as `name`.
    pub fn builder<T: 'static>(name: &'static str) -> MetaClassBuilder {
        MetaClassBuilder {
            identity: ClassIdentity::of::<T>(name),
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            properties: Vec::new(),
            supers: Vec::new(),
            constructor: None,
        }
    }

    #[inline(always)]
    pub fn identity(&self) -> ClassIdentity {
        self.identity
    }

    #[inline(always)]
    pub fn uid(&self) -> ClassUid {
        self.identity.uid()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.identity.name()
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The full Rust path of the described type.
    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Own properties, in declaration order.
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &dyn MetaProperty> + '_ {
        self.properties.iter().map(|p| &**p)
    }

    #[inline]
    pub fn properties_count(&self) -> usize {
        self.properties.len()
    }

    /// Own property at `index`, `None` when out of range.
    pub fn property(&self, index: usize) -> Option<&dyn MetaProperty> {
        self.properties.get(index).map(|p| &**p)
    }

    /// Position of an own property.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    /// Finds a property by name.
    ///
    /// With `recursive`, own properties are searched first, then each direct
    /// super class in declaration order, depth first. A derived property
    /// therefore hides a base property of the same name.
    pub fn property_by_name(&self, name: &str, recursive: bool) -> Option<&dyn MetaProperty> {
        if let Some(index) = self.property_index(name) {
            return self.property(index);
        }
        if recursive {
            for link in self.supers.iter() {
                if let Some(property) = link.class.property_by_name(name, true) {
                    return Some(property);
                }
            }
        }
        None
    }

    // -------------------------------------------------------------------------
    // Inheritance

    /// Links to the direct super classes, in declaration order.
    #[inline]
    pub fn super_classes(&self) -> &[SuperClassLink] {
        &self.supers
    }

    /// Every strict ancestor, depth first, without duplicates.
    #[inline]
    pub fn all_super_classes(&self) -> &[&'static MetaClass] {
        &self.ancestors
    }

    /// This class followed by [`all_super_classes`](Self::all_super_classes).
    pub fn all_ancestors(&self) -> impl Iterator<Item = &MetaClass> + '_ {
        core::iter::once(self).chain(self.ancestors.iter().map(|c| &**c))
    }

    /// `true` if some class in the hierarchy has more than one direct super
    /// class, so an ancestor may be reachable through several paths.
    #[inline(always)]
    pub fn has_multiple_inheritance(&self) -> bool {
        self.multiple_inheritance
    }

    /// `true` if `other` is this class or one of its ancestors.
    pub fn is_inherited_from(&self, other: &MetaClass) -> bool {
        ptr::eq(self, other) || self.ancestors.iter().any(|c| ptr::eq(*c, other))
    }

    /// Same as [`is_inherited_from`](Self::is_inherited_from), by UID.
    pub fn is_inherited_from_uid(&self, uid: ClassUid) -> bool {
        self.uid() == uid || self.ancestors.iter().any(|c| c.uid() == uid)
    }

    #[inline]
    pub fn is_inherited_from_type<T: Reflected>(&self) -> bool {
        self.is_inherited_from(T::meta_class())
    }

    /// The chain of links leading from this class to `target`.
    ///
    /// The search is depth first over the direct super classes in
    /// declaration order, and the first path found is returned. In a diamond
    /// this is the path through the earliest declared super class, not the
    /// shortest one.
    ///
    /// Returns an empty path for `target == self` and `None` when `target`
    /// is not an ancestor.
    pub fn inheritance_succession(&self, target: &MetaClass) -> Option<Vec<SuperClassLink>> {
        if !self.is_inherited_from(target) {
            return None;
        }
        let mut path = Vec::new();
        self.find_succession(target, &mut path).then_some(path)
    }

    /// Total byte offset of `target` inside this class, along
    /// [`inheritance_succession`](Self::inheritance_succession).
    pub fn succession_offset(&self, target: &MetaClass) -> Option<usize> {
        let path = self.inheritance_succession(target)?;
        Some(path.iter().map(SuperClassLink::offset).sum())
    }

    fn find_succession(&self, target: &MetaClass, path: &mut Vec<SuperClassLink>) -> bool {
        if ptr::eq(self, target) {
            return true;
        }
        for link in self.supers.iter() {
            path.push(*link);
            if link.class.find_succession(target, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    // -------------------------------------------------------------------------
    // Construction

    /// Creates a default instance, if the class has a constructor.
    pub fn create_instance(&self) -> Option<Box<dyn MetaObject>> {
        self.constructor.map(|construct| construct())
    }
}

impl PartialEq for MetaClass {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for MetaClass {}

impl fmt::Debug for MetaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaClass")
            .field("name", &self.name())
            .field("uid", &self.uid())
            .field("properties", &self.properties().map(|p| p.name()).collect::<Vec<_>>())
            .field("supers", &self.supers)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MetaClassBuilder

/// Collects the parts of a [`MetaClass`].
pub struct MetaClassBuilder {
    identity: ClassIdentity,
    type_id: TypeId,
    type_name: &'static str,
    properties: Vec<Box<dyn MetaProperty>>,
    supers: Vec<SuperClassLink>,
    constructor: Option<fn() -> Box<dyn MetaObject>>,
}

impl MetaClassBuilder {
    /// Adds a direct super class. Declaration order decides lookup priority.
    pub fn super_class(mut self, link: SuperClassLink) -> Self {
        if link.derived != self.type_id {
            log::error!(
                "Super class link to `{}` does not start at `{}`, ignored.",
                link.class.name(),
                self.identity.name(),
            );
            return self;
        }
        if self.supers.iter().any(|s| ptr::eq(s.class, link.class)) {
            log::error!(
                "Super class `{}` declared twice on `{}`, ignored.",
                link.class.name(),
                self.identity.name(),
            );
            return self;
        }
        self.supers.push(link);
        self
    }

    /// Adds a property. Names must be unique within the class.
    pub fn property(mut self, property: impl MetaProperty) -> Self {
        if property.declaring_class_uid() != self.identity.uid() {
            log::error!(
                "Property `{}` is not declared on `{}`, ignored.",
                property.name(),
                self.identity.name(),
            );
            return self;
        }
        if self.property_index(property.name()).is_some() {
            log::error!(
                "Property `{}` duplicate in `{}`, ignored.",
                property.name(),
                self.identity.name(),
            );
            return self;
        }
        self.properties.push(Box::new(property));
        self
    }

    /// Sets the function used by [`MetaClass::create_instance`].
    pub fn constructor(mut self, constructor: fn() -> Box<dyn MetaObject>) -> Self {
        self.constructor = Some(constructor);
        self
    }

    fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    pub fn build(self) -> MetaClass {
        let mut ancestors: Vec<&'static MetaClass> = Vec::new();
        for link in &self.supers {
            let reachable = core::iter::once(link.class).chain(link.class.ancestors.iter().copied());
            for class in reachable {
                if !ancestors.iter().any(|c| ptr::eq(*c, class)) {
                    ancestors.push(class);
                }
            }
        }

        let multiple_inheritance = self.supers.len() > 1 || ancestors.iter().any(|c| c.supers.len() > 1);

        MetaClass {
            identity: self.identity,
            type_id: self.type_id,
            type_name: self.type_name,
            properties: self.properties.into_boxed_slice(),
            supers: self.supers.into_boxed_slice(),
            ancestors: ancestors.into_boxed_slice(),
            multiple_inheritance,
            constructor: self.constructor,
        }
    }
}

// -----------------------------------------------------------------------------
// MetaClassCell

/// Storage for the meta class of one type.
///
/// The class is built on first access and inserted into the global
/// [`MetaRegistry`] at that moment.
///
/// # Examples
///
/// ```
/// use atelier_meta::class::{MetaClass, MetaClassCell, Reflected};
/// use atelier_meta::registry::MetaRegistry;
///
/// struct Marker;
///
/// impl Reflected for Marker {
///     fn meta_class() -> &'static MetaClass {
///         static CELL: MetaClassCell = MetaClassCell::new();
///         CELL.get_or_init(|| MetaClass::builder::<Marker>("Marker").build())
///     }
/// }
///
/// let class = Marker::meta_class();
/// assert!(core::ptr::eq(class, Marker::meta_class()));
/// assert!(MetaRegistry::read().contains(class.uid()));
/// ```
pub struct MetaClassCell(OnceLock<&'static MetaClass>);

impl MetaClassCell {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the class, building and registering it on first use.
    ///
    /// The class is registered before any caller can observe it. `init` may
    /// access the meta classes of other types, but not this one.
    pub fn get_or_init(&'static self, init: impl FnOnce() -> MetaClass) -> &'static MetaClass {
        self.0.get_or_init(|| {
            let class: &'static MetaClass = Box::leak(Box::new(init()));
            MetaRegistry::register(class);
            class
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
