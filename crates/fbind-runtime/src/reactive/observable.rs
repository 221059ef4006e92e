#![forbid(unsafe_code)]

//! Shared, version-tracked values with change notification.
//!
//! # Invariants
//!
//! 1. `version()` increments exactly once per `set()` that changes the value.
//! 2. A `set()` with a value equal to the current one is a no-op.
//! 3. The new value is visible through `get()` before any subscriber runs.
//!
//! # Failure Modes
//!
//! - Calling `set()` from inside a `with()` closure on the same observable
//!   panics with a `RefCell` borrow error; subscribers, however, may freely
//!   read and write the observable.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::signal::{Signal, Subscription};

/// An `old → new` transition published by an [`Observable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    pub old: T,
    pub new: T,
}

struct ObservableInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    changed: Signal<Change<T>>,
}

/// A shared value that publishes [`Change`] events when it is replaced.
///
/// Cloning an `Observable` creates another handle to the **same** value.
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                changed: Signal::new(),
            }),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value. Returns `true` when it changed.
    pub fn set(&self, value: T) -> bool {
        let old = {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            std::mem::replace(&mut *current, value.clone())
        };
        self.inner.version.set(self.inner.version.get() + 1);
        self.inner.changed.emit(&Change { old, new: value });
        true
    }

    /// Mutate a copy of the value and store it back through [`set`](Self::set).
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Subscribe to changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&Change<T>) + 'static) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    /// Monotonic change counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.subscriber_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_publishes_old_and_new() {
        let obs = Observable::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = obs.subscribe(move |c| s.borrow_mut().push((c.old, c.new)));

        assert!(obs.set(2));
        assert!(obs.set(5));
        assert_eq!(*seen.borrow(), vec![(1, 2), (2, 5)]);
    }

    #[test]
    fn equal_set_is_noop() {
        let obs = Observable::new("a".to_string());
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| c.set(c.get() + 1));

        assert!(!obs.set("a".to_string()));
        assert_eq!(obs.version(), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn version_counts_changes() {
        let obs = Observable::new(0);
        obs.set(1);
        obs.set(1);
        obs.set(2);
        assert_eq!(obs.version(), 2);
    }

    #[test]
    fn new_value_visible_to_subscribers() {
        let obs = Observable::new(0);
        let reader = obs.clone();
        let seen = Rc::new(Cell::new(-1));
        let s = Rc::clone(&seen);
        let _sub = obs.subscribe(move |_| s.set(reader.get()));

        obs.set(9);
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn update_mutates_in_place() {
        let obs = Observable::new(vec![1, 2]);
        assert!(obs.update(|v| v.push(3)));
        assert_eq!(obs.get(), vec![1, 2, 3]);
        assert!(!obs.update(|_| {}));
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new(1);
        let b = a.clone();
        b.set(4);
        assert_eq!(a.get(), 4);
        assert_eq!(a.version(), 1);
    }

    #[test]
    fn subscriber_may_write_back() {
        let obs = Observable::new(0);
        let writer = obs.clone();
        let _clamp = obs.subscribe(move |c| {
            if c.new > 10 {
                writer.set(10);
            }
        });

        obs.set(50);
        assert_eq!(obs.get(), 10);
    }
}
