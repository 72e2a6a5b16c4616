//! Class identities.
//!
//! Every reflected type, and every value type a property can hold, has a
//! [`ClassUid`]: a 32-bit hash of the type's full path computed with a
//! fixed seed. The same type therefore has the same UID in every process.

use core::fmt;

use atelier_utils::hash::hash_str;

// -----------------------------------------------------------------------------
// ClassUid

/// A process-stable identifier of a type.
///
/// `0` is reserved for [`ClassUid::NONE`] and is never produced by hashing.
///
/// # Examples
///
/// ```
/// use atelier_meta::identity::ClassUid;
///
/// assert_eq!(ClassUid::of::<i32>(), ClassUid::of::<i32>());
/// assert_ne!(ClassUid::of::<i32>(), ClassUid::of::<u32>());
/// assert!(!ClassUid::of::<String>().is_none());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ClassUid(u32);

impl ClassUid {
    /// The UID of "no class".
    pub const NONE: Self = Self(0);

    /// Hashes a name into a UID.
    pub fn from_name(name: &str) -> Self {
        let hash = hash_str(name);
        let folded = (hash ^ (hash >> 32)) as u32;
        Self(if folded == 0 { 1 } else { folded })
    }

    /// The UID of type `T`, hashed from [`core::any::type_name`].
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_name(core::any::type_name::<T>())
    }

    /// Wraps a raw value, e.g. one read back from a snapshot.
    #[inline(always)]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for ClassUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassUid({:#010x})", self.0)
    }
}

impl fmt::Display for ClassUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class uid {:#010x}", self.0)
    }
}

// -----------------------------------------------------------------------------
// ClassIdentity

/// The UID and display name of a registered class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassIdentity {
    uid: ClassUid,
    name: &'static str,
}

impl ClassIdentity {
    #[inline]
    pub const fn new(uid: ClassUid, name: &'static str) -> Self {
        Self { uid, name }
    }

    /// The identity of type `T` shown as `name`.
    #[inline]
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(ClassUid::of::<T>(), name)
    }

    #[inline(always)]
    pub const fn uid(&self) -> ClassUid {
        self.uid
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// -----------------------------------------------------------------------------
// Tests
