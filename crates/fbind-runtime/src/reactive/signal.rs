#![forbid(unsafe_code)]

//! Ordered publish/subscribe channel with RAII subscriptions.
//!
//! # Usage
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use fbind_runtime::reactive::Signal;
//!
//! let editable_changed = Signal::<bool>::new();
//! let seen = Rc::new(Cell::new(true));
//!
//! let s = Rc::clone(&seen);
//! let sub = editable_changed.subscribe(move |v| s.set(*v));
//! editable_changed.emit(&false);
//! assert!(!seen.get());
//!
//! drop(sub);
//! editable_changed.emit(&true);
//! assert!(!seen.get());
//! ```
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the caller of `emit()`; later subscribers
//!   are not notified for that event.
//! - Re-entrant `emit()` from inside a callback: allowed; the nested emission
//!   completes before the outer one continues.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<E> = dyn Fn(&E);

struct SignalInner<E> {
    subscribers: Vec<Weak<Callback<E>>>,
}

/// Publish/subscribe channel for events of type `E`.
///
/// Cloning a `Signal` yields another handle to the same subscriber list.
pub struct Signal<E> {
    inner: Rc<RefCell<SignalInner<E>>>,
}

impl<E> Clone for Signal<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                subscribers: Vec::new(),
            })),
        }
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E: 'static> Signal<E> {
    /// Create a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`. It stays registered while the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let callback: Rc<Callback<E>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            guard: Some(Box::new(callback)),
        }
    }

    /// Notify every live subscriber, in registration order.
    ///
    /// The subscriber list is snapshotted before the first callback runs, so
    /// callbacks may subscribe, unsubscribe or emit again. A subscriber
    /// dropped mid-emission is skipped; one added mid-emission first sees
    /// the next event.
    pub fn emit(&self, event: &E) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            inner.subscribers.clone()
        };
        for weak in snapshot {
            if let Some(callback) = weak.upgrade() {
                callback(event);
            }
        }
    }
}

impl<E> Signal<E> {
    /// Number of subscriptions still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Whether no live subscription exists.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.subscriber_count() == 0
    }
}

/// RAII guard for a [`Signal`] callback.
///
/// Dropping the guard (or calling [`unsubscribe`](Self::unsubscribe))
/// releases the callback.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    /// Release the callback now.
    pub fn unsubscribe(mut self) {
        self.guard.take();
    }

    /// A guard that holds nothing. Useful as a placeholder.
    pub fn detached() -> Self {
        Self { guard: None }
    }

    /// Fold several guards into one that releases them all together.
    pub fn combine(subs: impl IntoIterator<Item = Subscription>) -> Self {
        let subs: Vec<Subscription> = subs.into_iter().collect();
        Self {
            guard: Some(Box::new(subs)),
        }
    }

    /// Whether this guard still holds a callback.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribers_run_in_registration_order() {
        let signal = Signal::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let subs: Vec<_> = (0..3)
            .map(|i| {
                let log = Rc::clone(&log);
                signal.subscribe(move |v| log.borrow_mut().push((i, *v)))
            })
            .collect();

        signal.emit(&7);
        assert_eq!(*log.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
        drop(subs);
    }

    #[test]
    fn drop_unsubscribes() {
        let signal = Signal::<u32>::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let sub = signal.subscribe(move |_| c.set(c.get() + 1));
        assert_eq!(signal.subscriber_count(), 1);

        signal.emit(&1);
        drop(sub);
        signal.emit(&2);

        assert_eq!(count.get(), 1);
        assert!(signal.is_idle());
    }

    #[test]
    fn explicit_unsubscribe() {
        let signal = Signal::<()>::new();
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        let sub = signal.subscribe(move |()| h.set(true));
        assert!(sub.is_active());

        sub.unsubscribe();
        signal.emit(&());
        assert!(!hit.get());
    }

    #[test]
    fn unsubscribe_during_emit_skips_later_subscriber() {
        let signal = Signal::<()>::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let victim_ran = Rc::new(Cell::new(false));

        let v = Rc::clone(&victim);
        let _killer = signal.subscribe(move |()| {
            v.borrow_mut().take();
        });
        let ran = Rc::clone(&victim_ran);
        *victim.borrow_mut() = Some(signal.subscribe(move |()| ran.set(true)));

        signal.emit(&());
        assert!(!victim_ran.get(), "dropped mid-emission must not run");
    }

    #[test]
    fn subscribe_during_emit_sees_next_event() {
        let signal = Signal::<u32>::new();
        let late: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sig = signal.clone();
        let late_c = Rc::clone(&late);
        let seen_c = Rc::clone(&seen);
        let _first = signal.subscribe(move |_| {
            if late_c.borrow().is_empty() {
                let seen = Rc::clone(&seen_c);
                let sub = sig.subscribe(move |v| seen.borrow_mut().push(*v));
                late_c.borrow_mut().push(sub);
            }
        });

        signal.emit(&1);
        signal.emit(&2);
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn reentrant_emit_completes() {
        let signal = Signal::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let sig = signal.clone();
        let l = Rc::clone(&log);
        let _sub = signal.subscribe(move |v| {
            l.borrow_mut().push(*v);
            if *v == 1 {
                sig.emit(&2);
            }
        });

        signal.emit(&1);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn combined_subscription_releases_all() {
        let a = Signal::<()>::new();
        let b = Signal::<()>::new();
        let sub = Subscription::combine([a.subscribe(|()| {}), b.subscribe(|()| {})]);
        assert_eq!(a.subscriber_count() + b.subscriber_count(), 2);

        drop(sub);
        assert!(a.is_idle());
        assert!(b.is_idle());
    }

    #[test]
    fn detached_subscription_is_inert() {
        let sub = Subscription::detached();
        assert!(!sub.is_active());
        assert!(format!("{sub:?}").contains("active: false"));
    }
}
