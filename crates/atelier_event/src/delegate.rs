use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::mem;
use core::ptr;

// -----------------------------------------------------------------------------
// Slots

struct Slot<A: ?Sized> {
    id: u64,
    // `None` once unsubscribed.
    callback: Option<Rc<dyn Fn(&A)>>,
}

struct Slots<A: ?Sized> {
    slots: RefCell<Vec<Slot<A>>>,
    next_id: Cell<u64>,
    depth: Cell<u32>,
}

impl<A: ?Sized> Slots<A> {
    fn compact(&self) {
        if self.depth.get() == 0 {
            let dead: Vec<Slot<A>> = {
                let mut slots = self.slots.borrow_mut();
                let (live, dead): (Vec<_>, Vec<_>) = mem::take(&mut *slots)
                    .into_iter()
                    .partition(|slot| slot.callback.is_some());
                *slots = live;
                dead
            };
            drop(dead);
        }
    }
}

/// Type-erased access for subscription handles.
trait Detach {
    fn detach(&self, id: u64);
}

impl<A: ?Sized> Detach for Slots<A> {
    fn detach(&self, id: u64) {
        // Dropped after the borrow ends, the callback may own handles that
        // detach from this delegate.
        let callback = self
            .slots
            .borrow_mut()
            .iter_mut()
            .find(|slot| slot.id == id)
            .and_then(|slot| slot.callback.take());
        drop(callback);
    }
}

/// Leaves the invocation on drop, so a panicking callback does not block
/// compaction forever.
struct InvokeGuard<'a, A: ?Sized>(&'a Slots<A>);

impl<A: ?Sized> Drop for InvokeGuard<'_, A> {
    fn drop(&mut self) {
        self.0.depth.set(self.0.depth.get() - 1);
        self.0.compact();
    }
}

// -----------------------------------------------------------------------------
// Subscription

/// A handle to one subscribed callback.
///
/// Dropping the handle keeps the callback subscribed; see
/// [`DelegateReceiver`](crate::DelegateReceiver) for automatic cleanup.
pub struct Subscription {
    id: u64,
    owner: Weak<dyn Detach>,
}

impl Subscription {
    /// Unsubscribes the callback. No-op if the delegate is gone.
    pub fn cancel(&self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(self.id);
        }
    }

    /// `true` while the delegate this handle belongs to is alive.
    pub fn is_attached(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

// -----------------------------------------------------------------------------
// MultiDelegate

/// An ordered list of callbacks taking `&A`.
///
/// Unsubscribing marks a slot inert; inert slots are dropped when no
/// invocation is running, either at the end of [`invoke`](Self::invoke) or
/// on [`update`](Self::update). Callbacks subscribed during an invocation
/// are first called by the next one.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use atelier_event::MultiDelegate;
///
/// let total = Rc::new(Cell::new(0));
/// let delegate = MultiDelegate::<i32>::new();
///
/// let sum = total.clone();
/// let handle = delegate.subscribe(move |v| sum.set(sum.get() + *v));
///
/// delegate.invoke(&2);
/// delegate.unsubscribe(&handle);
/// delegate.invoke(&5);
/// assert_eq!(total.get(), 2);
/// ```
pub struct MultiDelegate<A: ?Sized + 'static> {
    inner: Rc<Slots<A>>,
}

impl<A: ?Sized + 'static> MultiDelegate<A> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Slots {
                slots: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                depth: Cell::new(0),
            }),
        }
    }

    /// Appends a callback.
    pub fn subscribe(&self, callback: impl Fn(&A) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.slots.borrow_mut().push(Slot {
            id,
            callback: Some(Rc::new(callback)),
        });

        let weak: Weak<Slots<A>> = Rc::downgrade(&self.inner);
        let owner: Weak<dyn Detach> = weak;
        Subscription { id, owner }
    }

    /// Appends a callback that is unsubscribed when `receiver` drops.
    pub fn subscribe_receiver(
        &self,
        receiver: &mut crate::DelegateReceiver,
        callback: impl Fn(&A) + 'static,
    ) {
        receiver.track(self.subscribe(callback));
    }

    /// Marks the callback inert. Handles of other delegates are ignored.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        if ptr::addr_eq(subscription.owner.as_ptr(), Rc::as_ptr(&self.inner)) {
            self.inner.detach(subscription.id);
        }
    }

    /// Drops inert slots, unless an invocation is running.
    pub fn update(&self) {
        self.inner.compact();
    }

    /// Unsubscribes every callback.
    pub fn clear(&self) {
        let removed: Vec<Rc<dyn Fn(&A)>> = {
            let mut slots = self.inner.slots.borrow_mut();
            if self.inner.depth.get() == 0 {
                mem::take(&mut *slots)
                    .into_iter()
                    .filter_map(|slot| slot.callback)
                    .collect()
            } else {
                slots.iter_mut().filter_map(|slot| slot.callback.take()).collect()
            }
        };
        drop(removed);
    }

    /// Number of live callbacks.
    pub fn len(&self) -> usize {
        self.inner
            .slots
            .borrow()
            .iter()
            .filter(|slot| slot.callback.is_some())
            .count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every live callback in subscription order.
    pub fn invoke(&self, args: &A) {
        let count = self.inner.slots.borrow().len();
        self.inner.depth.set(self.inner.depth.get() + 1);
        let _guard = InvokeGuard(&self.inner);

        for index in 0..count {
            // Released before the call, the callback may touch this delegate.
            let callback = self.inner.slots.borrow()[index].callback.clone();
            if let Some(callback) = callback {
                callback(args);
            }
        }
    }
}

impl<A: ?Sized + 'static> Default for MultiDelegate<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + 'static> fmt::Debug for MultiDelegate<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiDelegate").field("len", &self.len()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn record(log: &Log, name: &'static str) -> impl Fn(&u32) + 'static {
        let log = log.clone();
        move |_| log.borrow_mut().push(name)
    }

    #[test]
    fn invokes_in_subscription_order() {
        let log = Log::default();
        let delegate = MultiDelegate::<u32>::new();
        delegate.subscribe(record(&log, "a"));
        delegate.subscribe(record(&log, "b"));
        delegate.subscribe(record(&log, "c"));

        delegate.invoke(&0);
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
        assert_eq!(delegate.len(), 3);
    }

    #[test]
    fn unsubscribe_self_during_invoke() {
        let log = Log::default();
        let delegate = MultiDelegate::<u32>::new();
        let handle: Rc<RefCell<Option<Subscription>>> = Rc::default();

        delegate.subscribe(record(&log, "first"));
        let once = {
            let (log, handle) = (log.clone(), handle.clone());
            move |_: &u32| {
                log.borrow_mut().push("once");
                if let Some(handle) = handle.borrow().as_ref() {
                    handle.cancel();
                }
            }
        };
        *handle.borrow_mut() = Some(delegate.subscribe(once));
        delegate.subscribe(record(&log, "last"));

        delegate.invoke(&0);
        delegate.invoke(&0);
        assert_eq!(*log.borrow(), ["first", "once", "last", "first", "last"]);
        assert_eq!(delegate.len(), 2);
    }

    #[test]
    fn unsubscribe_later_slot_during_invoke() {
        let log = Log::default();
        let delegate = Rc::new(MultiDelegate::<u32>::new());
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::default();

        {
            let (log, victim) = (log.clone(), victim.clone());
            delegate.subscribe(move |_| {
                log.borrow_mut().push("killer");
                if let Some(victim) = victim.borrow().as_ref() {
                    victim.cancel();
                }
            });
        }
        *victim.borrow_mut() = Some(delegate.subscribe(record(&log, "victim")));
        delegate.subscribe(record(&log, "survivor"));

        delegate.invoke(&0);
        assert_eq!(*log.borrow(), ["killer", "survivor"]);
    }

    #[test]
    fn subscribe_during_invoke_waits_for_next_pass() {
        let log = Log::default();
        let delegate = Rc::new(MultiDelegate::<u32>::new());
        {
            let (log, weak) = (log.clone(), Rc::downgrade(&delegate));
            let added = Rc::new(core::cell::Cell::new(false));
            delegate.subscribe(move |_| {
                log.borrow_mut().push("adder");
                if !added.replace(true) {
                    if let Some(delegate) = weak.upgrade() {
                        delegate.subscribe(record(&log, "added"));
                    }
                }
            });
        }

        delegate.invoke(&0);
        assert_eq!(*log.borrow(), ["adder"]);
        delegate.invoke(&0);
        assert_eq!(*log.borrow(), ["adder", "adder", "added"]);
    }

    #[test]
    fn nested_invoke() {
        let delegate = Rc::new(MultiDelegate::<u32>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let (seen, weak) = (seen.clone(), Rc::downgrade(&delegate));
            delegate.subscribe(move |depth| {
                seen.borrow_mut().push(*depth);
                if *depth < 2 {
                    if let Some(delegate) = weak.upgrade() {
                        delegate.invoke(&(depth + 1));
                    }
                }
            });
        }
        delegate.invoke(&0);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn clear_and_update() {
        let log = Log::default();
        let delegate = MultiDelegate::<u32>::new();
        let a = delegate.subscribe(record(&log, "a"));
        delegate.subscribe(record(&log, "b"));

        a.cancel();
        assert_eq!(delegate.len(), 1);
        delegate.update();
        assert_eq!(delegate.inner.slots.borrow().len(), 1);

        delegate.clear();
        assert!(delegate.is_empty());
        delegate.invoke(&0);
        assert!(log.borrow().is_empty());
    }

    fn owning_receiver(delegate: &MultiDelegate<u32>) -> Subscription {
        let mut receiver = crate::DelegateReceiver::new();
        delegate.subscribe_receiver(&mut receiver, |_| {});
        delegate.subscribe(move |_| {
            let _ = &receiver;
        })
    }

    #[test]
    fn unsubscribe_drops_callback_owning_receiver() {
        let delegate = MultiDelegate::<u32>::new();
        let handle = owning_receiver(&delegate);
        assert_eq!(delegate.len(), 2);

        delegate.unsubscribe(&handle);
        assert!(delegate.is_empty());
        delegate.update();
        assert!(delegate.inner.slots.borrow().is_empty());
    }

    #[test]
    fn clear_drops_callback_owning_receiver() {
        let delegate = MultiDelegate::<u32>::new();
        owning_receiver(&delegate);

        delegate.clear();
        assert!(delegate.is_empty());
        delegate.invoke(&0);
    }

    #[test]
    fn clear_during_invoke_drops_callback_owning_receiver() {
        let delegate = Rc::new(MultiDelegate::<u32>::new());
        {
            let weak = Rc::downgrade(&delegate);
            delegate.subscribe(move |_| {
                if let Some(delegate) = weak.upgrade() {
                    delegate.clear();
                }
            });
        }
        owning_receiver(&delegate);

        delegate.invoke(&0);
        assert!(delegate.is_empty());
        assert!(delegate.inner.slots.borrow().is_empty());
    }

    #[test]
    fn foreign_handles_are_ignored() {
        let log = Log::default();
        let first = MultiDelegate::<u32>::new();
        let second = MultiDelegate::<u32>::new();
        let handle = first.subscribe(record(&log, "first"));
        second.subscribe(record(&log, "second"));

        second.unsubscribe(&handle);
        assert_eq!(second.len(), 1);
        assert_eq!(first.len(), 1);

        drop(first);
        assert!(!handle.is_attached());
        handle.cancel();
    }

    #[test]
    fn unsized_arguments() {
        let delegate = MultiDelegate::<str>::new();
        let out = Rc::new(RefCell::new(alloc::string::String::new()));
        let sink = out.clone();
        delegate.subscribe(move |text| sink.borrow_mut().push_str(text));
        delegate.invoke("hello");
        assert_eq!(*out.borrow(), "hello");
    }
}
