//! Items used by the exported macros. Not public API.

pub use alloc::boxed::Box;
pub use alloc::string::String;
pub use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// auto_register

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use core::sync::atomic::{AtomicBool, Ordering};

    pub use inventory;

    /// A static registration hook, collected by [`inventory`].
    pub struct AutoRegisterFn(pub fn());

    inventory::collect!(AutoRegisterFn);

    static AVAILABLE: AtomicBool = AtomicBool::new(false);

    fn mark_available() {
        AVAILABLE.store(true, Ordering::Relaxed);
    }

    inventory::submit! {
        AutoRegisterFn(mark_available)
    }

    /// Builds and registers the meta class of `T`.
    pub fn register_class<T: crate::class::Reflected>() {
        let _ = T::meta_class();
    }

    /// Runs every submitted hook, returns whether the platform collected them.
    pub fn register_all() -> bool {
        for hook in inventory::iter::<AutoRegisterFn> {
            (hook.0)();
        }
        AVAILABLE.load(Ordering::Relaxed)
    }
}
