//! The process-wide class table.
//!
//! Classes enter the registry the first time their
//! [`Reflected::meta_class`](crate::class::Reflected::meta_class) is called,
//! or at startup through [`MetaRegistry::auto_register`]. The table is
//! guarded by a [`RwLock`]: registration takes the write lock briefly,
//! lookups take the read lock.
//!
//! Registration never blocks on the table. A class registered while the
//! lock is held elsewhere, including by a read guard on the registering
//! thread, waits in a pending list that lookups on the global table also
//! search; the next lock taken through [`MetaRegistry::read`] or
//! [`MetaRegistry::write`] moves it into the table.

use alloc::vec::Vec;
use core::fmt;
use core::mem;
use core::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::TryLockError;

use atelier_utils::hash::{FixedHashState, HashMap, PassHashMap, PassHashState};

use crate::RegistrationError;
use crate::class::MetaClass;
use crate::identity::ClassUid;

static REGISTRY: RwLock<MetaRegistry> = RwLock::new(MetaRegistry::global());

static PENDING: Mutex<Vec<&'static MetaClass>> = Mutex::new(Vec::new());

fn pending() -> MutexGuard<'static, Vec<&'static MetaClass>> {
    PENDING.lock().unwrap_or_else(PoisonError::into_inner)
}

// -----------------------------------------------------------------------------
// MetaRegistry

/// A table of meta classes by UID and by name.
pub struct MetaRegistry {
    by_uid: PassHashMap<ClassUid, &'static MetaClass>,
    by_name: HashMap<&'static str, &'static MetaClass>,
    // Set on the global table only, whose lookups also search `PENDING`.
    shared: bool,
}

impl MetaRegistry {
    /// Creates an empty table, detached from the global one.
    pub const fn empty() -> Self {
        Self {
            by_uid: PassHashMap::with_hasher(PassHashState),
            by_name: HashMap::with_hasher(FixedHashState),
            shared: false,
        }
    }

    const fn global() -> Self {
        let mut registry = Self::empty();
        registry.shared = true;
        registry
    }

    /// Takes a read lock on the global registry.
    ///
    /// Classes may be registered while the guard is held, on this thread
    /// or others; lookups through the guard see them.
    pub fn read() -> RwLockReadGuard<'static, MetaRegistry> {
        let waiting = !pending().is_empty();
        if waiting && let Some(mut registry) = Self::try_write() {
            registry.drain_pending();
        }
        REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the global registry.
    ///
    /// Blocks until every guard is released, including read guards held by
    /// the calling thread.
    pub fn write() -> RwLockWriteGuard<'static, MetaRegistry> {
        let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
        registry.drain_pending();
        registry
    }

    fn try_write() -> Option<RwLockWriteGuard<'static, MetaRegistry>> {
        match REGISTRY.try_write() {
            Ok(registry) => Some(registry),
            Err(TryLockError::Poisoned(err)) => Some(err.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Inserts a class into the global registry.
    ///
    /// A UID collision is logged. With the `debug` feature in a debug build
    /// it also panics; otherwise the first class keeps the UID. The
    /// collision is detected when the class leaves the pending list, which
    /// is later than this call if the table is locked.
    pub fn register(class: &'static MetaClass) {
        pending().push(class);
        match Self::try_write() {
            Some(mut registry) => registry.drain_pending(),
            None => log::trace!("Registry locked, meta class `{}` is pending.", class.name()),
        }
    }

    fn drain_pending(&mut self) {
        let classes = mem::take(&mut *pending());
        for class in classes {
            if let Err(err) = self.try_register(class) {
                log::error!("{err}");
                #[cfg(all(debug_assertions, feature = "debug"))]
                panic!("{err}");
            }
        }
    }

    fn find_pending(&self, pred: impl Fn(&MetaClass) -> bool) -> Option<&'static MetaClass> {
        if !self.shared {
            return None;
        }
        pending().iter().copied().find(|class| pred(class))
    }

    fn pending_snapshot(&self) -> Vec<&'static MetaClass> {
        if self.shared { pending().clone() } else { Vec::new() }
    }

    /// Inserts a class, failing if a different class has the same UID.
    ///
    /// Inserting the same class twice is a no-op. A name already used by
    /// another class is only warned about; lookups by that name keep
    /// returning the first class.
    pub fn try_register(&mut self, class: &'static MetaClass) -> Result<(), RegistrationError> {
        if let Some(existing) = self.by_uid.get(&class.uid()) {
            if ptr::eq(*existing, class) {
                return Ok(());
            }
            return Err(RegistrationError::DuplicateUid {
                uid: class.uid(),
                existing: existing.type_name(),
                incoming: class.type_name(),
            });
        }

        self.by_uid.insert(class.uid(), class);
        if let Some(existing) = self.by_name.get(class.name()) {
            log::warn!(
                "Meta class name `{}` is used by both `{}` and `{}`.",
                class.name(),
                existing.type_name(),
                class.type_name(),
            );
        } else {
            self.by_name.insert(class.name(), class);
        }
        log::debug!("Registered meta class `{}` ({}).", class.name(), class.uid());
        Ok(())
    }

    pub fn get(&self, uid: ClassUid) -> Option<&'static MetaClass> {
        self.by_uid
            .get(&uid)
            .copied()
            .or_else(|| self.find_pending(|class| class.uid() == uid))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&'static MetaClass> {
        self.by_name
            .get(name)
            .copied()
            .or_else(|| self.find_pending(|class| class.name() == name))
    }

    #[inline]
    pub fn contains(&self, uid: ClassUid) -> bool {
        self.get(uid).is_some()
    }

    pub fn len(&self) -> usize {
        let pending = if self.shared { pending().len() } else { 0 };
        self.by_uid.len() + pending
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered classes, in no particular order.
    pub fn classes(&self) -> impl Iterator<Item = &'static MetaClass> + '_ {
        self.by_uid.values().copied().chain(self.pending_snapshot())
    }

    pub fn for_each(&self, f: impl FnMut(&'static MetaClass)) {
        self.classes().for_each(f);
    }

    /// Registers every type named in
    /// [`impl_auto_register!`](crate::impl_auto_register).
    ///
    /// Returns `false` when static registration is unavailable, either
    /// because the `auto_register` feature is off or the platform does not
    /// support it. Types then register on first use.
    pub fn auto_register() -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::register_all()
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl fmt::Debug for MetaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_name.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
