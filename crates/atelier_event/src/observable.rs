use core::fmt;

use crate::MultiDelegate;

/// A value that notifies subscribers when it changes.
///
/// [`set_value`](Self::set_value) stores the new value first and then
/// invokes [`event_value_changed`](Self::event_value_changed) with it.
/// Setting an equal value does nothing.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use atelier_event::ObservableValue;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut volume = ObservableValue::new(5_u8);
///
/// let sink = seen.clone();
/// volume.event_value_changed().subscribe(move |v| sink.borrow_mut().push(*v));
///
/// volume.set_value(5);
/// volume.set_value(7);
/// volume.set_value_without_notify(9);
/// assert_eq!(*seen.borrow(), [7]);
/// assert_eq!(*volume.value(), 9);
/// ```
#[derive(Default)]
pub struct ObservableValue<T: 'static> {
    value: T,
    changed: MultiDelegate<T>,
}

impl<T: 'static> ObservableValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            changed: MultiDelegate::new(),
        }
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Stores `value` without notifying, e.g. while loading.
    #[inline]
    pub fn set_value_without_notify(&mut self, value: T) {
        self.value = value;
    }

    /// The delegate invoked after each change.
    #[inline]
    pub fn event_value_changed(&self) -> &MultiDelegate<T> {
        &self.changed
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: PartialEq + 'static> ObservableValue<T> {
    /// Stores `value` and notifies, unless it equals the current value.
    ///
    /// Returns whether the value changed.
    pub fn set_value(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.changed.invoke(&self.value);
        true
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableValue")
            .field("value", &self.value)
            .field("subscribers", &self.changed.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use super::*;

    #[test]
    fn equal_value_does_not_fire() {
        let fired = Rc::new(Cell::new(0));
        let mut name = ObservableValue::new(String::from("a"));
        let f = fired.clone();
        name.event_value_changed().subscribe(move |_| f.set(f.get() + 1));

        assert!(!name.set_value(String::from("a")));
        assert_eq!(fired.get(), 0);

        assert!(name.set_value(String::from("b")));
        assert!(name.set_value(String::from("c")));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn subscribers_see_new_value_in_order() {
        let seen: Rc<RefCell<Vec<(u8, i32)>>> = Rc::default();
        let mut value = ObservableValue::new(1);

        for id in 0..2 {
            let seen = seen.clone();
            value.event_value_changed().subscribe(move |v| seen.borrow_mut().push((id, *v)));
        }

        value.set_value(4);
        assert_eq!(*seen.borrow(), [(0, 4), (1, 4)]);
    }

    #[test]
    fn without_notify_is_silent() {
        let fired = Rc::new(Cell::new(false));
        let mut value = ObservableValue::<f32>::default();
        let f = fired.clone();
        value.event_value_changed().subscribe(move |_| f.set(true));

        value.set_value_without_notify(2.5);
        assert!(!fired.get());
        assert_eq!(value.into_inner(), 2.5);
    }
}
