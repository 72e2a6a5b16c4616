use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_address {
    ($addr:ident) => {
        impl $addr<'_> {
            /// Returns the numeric address, mostly useful for identity checks.
            #[inline(always)]
            pub fn addr(&self) -> usize {
                self.0.as_ptr().addr()
            }

            /// Check if the address is aligned to type `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                self.0.as_ptr().cast::<T>().is_aligned()
            }

            /// Checks alignment in debug builds only.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_aligned<T>(&self) {
                debug_assert!(
                    self.is_aligned::<T>(),
                    "address {:p} does not have alignment {} for type {}",
                    self.0,
                    align_of::<T>(),
                    core::any::type_name::<T>(),
                );
            }

            /// Moves the address forward by `count` bytes.
            ///
            /// Used to go from an object to one of its embedded sub-objects.
            ///
            /// # Safety
            /// - The result must stay inside the object this address was made from.
            #[inline]
            pub const unsafe fn byte_add(self, count: usize) -> Self {
                // SAFETY: The caller keeps the result inside the same allocation.
                Self(unsafe { self.0.byte_add(count) }, PhantomData)
            }

            /// Moves the address backward by `count` bytes.
            ///
            /// Used to go from an embedded sub-object back to its container.
            ///
            /// # Safety
            /// - The result must stay inside the object this address was made from.
            /// - The address must carry the provenance of the whole container,
            ///   i.e. it was derived from the container by [`byte_add`](Self::byte_add).
            #[inline]
            pub const unsafe fn byte_sub(self, count: usize) -> Self {
                // SAFETY: See above.
                Self(unsafe { self.0.byte_sub(count) }, PhantomData)
            }
        }

        impl From<$addr<'_>> for NonNull<u8> {
            #[inline(always)]
            fn from(addr: $addr<'_>) -> Self {
                addr.0
            }
        }

        impl PartialEq for $addr<'_> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl Eq for $addr<'_> {}

        impl fmt::Pointer for $addr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $addr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($addr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Address

/// The erased address of an object borrowed for `'a`, similar to `&'a dyn Any`.
///
/// The pointee type is not recorded. Whoever turns the address back into a
/// reference must know it, typically through a class descriptor.
///
/// # Examples
///
/// ```
/// # use atelier_ptr::Address;
/// let x = 8i32;
/// let addr = Address::from_ref(&x);
///
/// let rx = unsafe { addr.deref::<i32>() };
/// assert_eq!(*rx, 8);
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Address<'a>(NonNull<u8>, PhantomData<&'a u8>);

impl_address!(Address);

impl<'a> Address<'a> {
    /// Create an `Address` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a live object for `'a`.
    /// - The object must not be mutated while the address is alive.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Self {
        Self(ptr, PhantomData)
    }

    /// Erases a shared reference.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Self {
        Self(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Turns the address back into `&T`.
    ///
    /// # Safety
    /// - `T` must be the type of the object at this address.
    /// - The address must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn deref<T>(self) -> &'a T {
        // SAFETY: Type correct, aligned and pointee valid for `'a`.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Address<'a> {
    #[inline]
    fn from(val: &'a T) -> Self {
        Self::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// AddressMut

/// The erased address of an object mutably borrowed for `'a`,
/// similar to `&'a mut dyn Any`.
///
/// Not `Copy`: the exclusive borrow is tracked by the borrow checker through
/// [`reborrow`](Self::reborrow) and [`as_const`](Self::as_const).
///
/// # Examples
///
/// ```
/// # use atelier_ptr::AddressMut;
/// let mut x = 8i32;
/// let mut addr = AddressMut::from_mut(&mut x);
///
/// unsafe { *addr.as_mut::<i32>() += 2 };
/// assert_eq!(x, 10);
/// ```
#[repr(transparent)]
pub struct AddressMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_address!(AddressMut);

impl<'a> AddressMut<'a> {
    /// Create an `AddressMut` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a live object for `'a`, valid for writes.
    /// - Nothing else may access the object while the address is alive.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Self {
        Self(ptr, PhantomData)
    }

    /// Erases an exclusive reference.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> Self {
        Self(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Gets a shared [`Address`] with a shorter lifetime.
    #[inline(always)]
    pub const fn as_const(&self) -> Address<'_> {
        Address(self.0, PhantomData)
    }

    /// Gets a new [`AddressMut`] with a shorter lifetime.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> AddressMut<'_> {
        AddressMut(self.0, PhantomData)
    }

    /// Converts into a shared [`Address`] keeping the full lifetime.
    #[inline(always)]
    pub const fn into_const(self) -> Address<'a> {
        Address(self.0, PhantomData)
    }

    /// Gets `&T` with the lifetime of `&self`.
    ///
    /// # Safety
    /// - `T` must be the type of the object at this address.
    /// - The address must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(&self) -> &'_ T {
        // SAFETY: Type correct, aligned and pointee valid.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }

    /// Gets `&mut T` with the lifetime of `&mut self`.
    ///
    /// # Safety
    /// - `T` must be the type of the object at this address.
    /// - The address must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_mut<T>(&mut self) -> &'_ mut T {
        // SAFETY: Type correct, aligned and pointee valid.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }

    /// Converts into `&'a mut T`, consuming the address.
    ///
    /// # Safety
    /// - `T` must be the type of the object at this address.
    /// - The address must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn consume<T>(self) -> &'a mut T {
        // SAFETY: Type correct, aligned and pointee valid for `'a`.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for AddressMut<'a> {
    #[inline]
    fn from(val: &'a mut T) -> Self {
        Self::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Address, AddressMut};

    #[repr(C)]
    struct Pair {
        head: u64,
        tail: u32,
    }

    #[test]
    fn shift_round_trip() {
        let pair = Pair { head: 1, tail: 7 };
        let base = Address::from_ref(&pair);
        let offset = core::mem::offset_of!(Pair, tail);

        let tail = unsafe { base.byte_add(offset) };
        assert_eq!(tail.addr(), base.addr() + offset);
        assert_eq!(unsafe { *tail.deref::<u32>() }, 7);

        let back = unsafe { tail.byte_sub(offset) };
        assert_eq!(back, base);
        assert_eq!(unsafe { back.deref::<Pair>() }.head, 1);
    }

    #[test]
    fn write_through_mut() {
        let mut pair = Pair { head: 1, tail: 7 };
        let offset = core::mem::offset_of!(Pair, tail);
        {
            let addr = AddressMut::from_mut(&mut pair);
            let mut tail = unsafe { addr.byte_add(offset) };
            tail.debug_assert_aligned::<u32>();
            unsafe { *tail.as_mut::<u32>() = 9 };
            assert_eq!(unsafe { *tail.as_const().deref::<u32>() }, 9);
        }
        assert_eq!(pair.tail, 9);
    }
}
