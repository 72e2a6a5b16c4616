//! Single-threaded events.
//!
//! - [`MultiDelegate`]: an ordered list of callbacks invoked together.
//! - [`DelegateReceiver`]: owns subscriptions and cancels them on drop.
//! - [`ObservableValue`]: a value that fires a delegate when it changes.
//!
//! Callbacks may subscribe, unsubscribe or invoke the same delegate while
//! it is being invoked.
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod delegate;
mod observable;
mod receiver;

// -----------------------------------------------------------------------------
// Exports

pub use delegate::{MultiDelegate, Subscription};
pub use observable::ObservableValue;
pub use receiver::DelegateReceiver;
