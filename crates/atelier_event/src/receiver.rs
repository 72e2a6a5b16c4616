use alloc::vec::Vec;

use crate::Subscription;

/// Owns subscriptions to any number of delegates and cancels them all when
/// dropped.
///
/// Embed one in an object whose callbacks must not outlive it.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use atelier_event::{DelegateReceiver, MultiDelegate};
///
/// let delegate = MultiDelegate::<u32>::new();
/// let calls = Rc::new(Cell::new(0));
///
/// let mut receiver = DelegateReceiver::new();
/// let counter = calls.clone();
/// delegate.subscribe_receiver(&mut receiver, move |_| counter.set(counter.get() + 1));
///
/// delegate.invoke(&1);
/// drop(receiver);
/// delegate.invoke(&2);
/// assert_eq!(calls.get(), 1);
/// assert!(delegate.is_empty());
/// ```
#[derive(Default, Debug)]
pub struct DelegateReceiver {
    subscriptions: Vec<Subscription>,
}

impl DelegateReceiver {
    pub const fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Takes ownership of a subscription.
    pub fn track(&mut self, subscription: Subscription) {
        self.subscriptions.retain(Subscription::is_attached);
        self.subscriptions.push(subscription);
    }

    /// Cancels every tracked subscription now.
    pub fn unsubscribe_all(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
    }

    /// Number of tracked subscriptions whose delegate is still alive.
    pub fn len(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_attached()).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for DelegateReceiver {
    fn drop(&mut self) {
        self.unsubscribe_all();
    }
}
