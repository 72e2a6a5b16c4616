use crate::class::MetaClass;

/// A type with a statically known meta class.
///
/// Implemented by [`impl_meta_class!`](crate::impl_meta_class). The class is
/// built and registered on the first call.
pub trait Reflected: 'static {
    fn meta_class() -> &'static MetaClass;
}

/// An object that can report its most derived meta class at runtime.
///
/// This is what lets a `&dyn MetaObject` become a
/// [`ConstMetaInstance`](crate::class::ConstMetaInstance), and what lets a
/// shared pointer's pointee be inspected through its real class.
///
/// # Safety
///
/// [`object_meta_class`](Self::object_meta_class) must return a class built
/// for `Self`, i.e. one whose [`type_id`](MetaClass::type_id) is
/// `TypeId::of::<Self>()`. Instance views read the object through that
/// class's layout.
#[expect(unsafe_code, reason = "Views trust the reported class layout.")]
pub unsafe trait MetaObject: 'static {
    fn object_meta_class(&self) -> &'static MetaClass;
}
