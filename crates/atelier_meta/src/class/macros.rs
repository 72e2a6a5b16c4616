// -----------------------------------------------------------------------------
// impl_meta_class

/// Implements [`Reflected`](crate::class::Reflected) and
/// [`MetaObject`](crate::class::MetaObject) for a struct.
///
/// Super classes are embedded fields, written `Super(field)`, listed in
/// priority order. Each property names its value type, a getter and a
/// setter, and optionally a default value shown by editors. The class is
/// named after the type and gets a constructor, so the type must implement
/// [`Default`].
///
/// ```
/// use atelier_meta::class::Reflected;
/// use atelier_meta::impl_meta_class;
///
/// #[derive(Default)]
/// struct Named { name: String }
///
/// #[derive(Default)]
/// struct Visible { visible: bool }
///
/// #[derive(Default)]
/// struct Node { named: Named, visible: Visible, depth: u32 }
///
/// impl_meta_class!(Named { "name": String => |s| s.name.clone(), |s, v| s.name = v; });
/// impl_meta_class!(Visible {
///     "visible": bool => |s| s.visible, |s, v| s.visible = v, default true;
/// });
/// impl_meta_class!(Node: Named(named), Visible(visible) {
///     "depth": u32 => |s| s.depth, |s, v| s.depth = v;
/// });
///
/// let class = Node::meta_class();
/// assert!(class.has_multiple_inheritance());
/// assert_eq!(class.succession_offset(Visible::meta_class()), Some(core::mem::offset_of!(Node, visible)));
/// ```
#[macro_export]
macro_rules! impl_meta_class {
    (
        $ty:ident $( : $( $super:ident ( $field:ident ) ),+ )? {
            $( $pname:literal : $vty:ty => $getter:expr , $setter:expr $( , default $default:expr )? ; )*
        }
    ) => {
        impl $crate::class::Reflected for $ty {
            fn meta_class() -> &'static $crate::class::MetaClass {
                static CELL: $crate::class::MetaClassCell = $crate::class::MetaClassCell::new();
                CELL.get_or_init(|| {
                    $crate::class::MetaClass::builder::<$ty>(::core::stringify!($ty))
                        $( $(
                            .super_class({
                                let _: fn(&$ty) -> &$super = |object| &object.$field;
                                #[allow(unsafe_code, reason = "The offset comes from `offset_of!` on a field of that type.")]
                                let link = unsafe {
                                    $crate::class::SuperClassLink::new::<$ty, $super>(
                                        ::core::mem::offset_of!($ty, $field),
                                    )
                                };
                                link
                            })
                        )+ )?
                        $(
                            .property(
                                $crate::class::GenericMetaProperty::<$ty, $vty>::new($pname, $getter, $setter)
                                    $( .with_default(|| $default) )?
                            )
                        )*
                        .constructor(|| -> $crate::__macro_exports::Box<dyn $crate::class::MetaObject> {
                            $crate::__macro_exports::Box::new(<$ty as ::core::default::Default>::default())
                        })
                        .build()
                })
            }
        }

        // SAFETY: The class above is built for this type.
        #[allow(unsafe_code, reason = "The reported class is built for this type.")]
        unsafe impl $crate::class::MetaObject for $ty {
            #[inline]
            fn object_meta_class(&self) -> &'static $crate::class::MetaClass {
                <$ty as $crate::class::Reflected>::meta_class()
            }
        }
    };
}

// -----------------------------------------------------------------------------
// impl_meta_class_value

/// Implements [`MetaValue`](crate::value::MetaValue) for reflected types, so
/// they can be held by properties of other classes.
///
/// The data block form is one entry per property, see
/// [`serialize_meta_instance`](crate::serialization::serialize_meta_instance).
/// The type must implement [`Clone`] and [`Default`].
#[macro_export]
macro_rules! impl_meta_class_value {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::value::MetaValue for $ty {
                const TRAITS: $crate::value::ValueTraits =
                    $crate::value::ValueTraits::REFLECTED.union($crate::value::ValueTraits::DATA_BLOCK);

                fn to_data_block(&self, block: &mut $crate::serialization::DataBlock) -> bool {
                    $crate::serialization::serialize_meta_instance(
                        $crate::class::ConstMetaInstance::new(self),
                        block,
                    )
                }

                fn from_data_block(block: &$crate::serialization::DataBlock) -> ::core::option::Option<Self> {
                    let mut value = <$ty as ::core::default::Default>::default();
                    $crate::serialization::deserialize_meta_instance(
                        &mut $crate::class::MetaInstance::new(&mut value),
                        block,
                    )
                    .then_some(value)
                }

                #[inline]
                fn value_meta_class() -> ::core::option::Option<&'static $crate::class::MetaClass> {
                    ::core::option::Option::Some(<$ty as $crate::class::Reflected>::meta_class())
                }
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// impl_auto_register

/// Registers reflected types at startup, see
/// [`MetaRegistry::auto_register`](crate::registry::MetaRegistry::auto_register).
///
/// Without the `auto_register` feature this expands to nothing and types
/// register on first use of their meta class.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! impl_auto_register {
    ($($ty:ident),+ $(,)?) => {
        $(
            $crate::__macro_exports::auto_register::inventory::submit! {
                $crate::__macro_exports::auto_register::AutoRegisterFn(
                    $crate::__macro_exports::auto_register::register_class::<$ty>
                )
            }
        )+
    };
}

/// Registers reflected types at startup, see
/// [`MetaRegistry::auto_register`](crate::registry::MetaRegistry::auto_register).
///
/// Without the `auto_register` feature this expands to nothing and types
/// register on first use of their meta class.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! impl_auto_register {
    ($($ty:ident),+ $(,)?) => {};
}
