//! Value sources: externally owned providers of a typed value.
//!
//! A source outlives any single binding and may be shared by many fields at
//! once; every binding subscribes independently and none may assume it owns
//! the source.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fbind_runtime::reactive::{Observable, Signal, Subscription};

use crate::error::SourceError;
use crate::value::ModelValue;

/// `old → new` change published by a [`ValueSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange<V> {
    pub old: Option<V>,
    pub new: Option<V>,
}

/// A typed value with change notification.
pub trait ValueSource<V: ModelValue> {
    /// Current value.
    fn value(&self) -> Option<V>;

    /// Replace the value. Read-only sources return [`SourceError::ReadOnly`].
    fn set_value(&self, value: Option<V>) -> Result<(), SourceError>;

    /// Whether writes are refused. Fields bound to a read-only source are
    /// not editable.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Subscribe to value changes.
    fn subscribe(&self, callback: Box<dyn Fn(&ValueChange<V>)>) -> Subscription;
}

/// Writable in-memory source.
#[derive(Clone)]
pub struct ValueHolder<V: ModelValue> {
    value: Observable<Option<V>>,
}

impl<V: ModelValue> ValueHolder<V> {
    #[must_use]
    pub fn new(value: Option<V>) -> Self {
        Self {
            value: Observable::new(value),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Number of live subscriptions (one per active binding).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.value.subscriber_count()
    }
}

impl<V: ModelValue> fmt::Debug for ValueHolder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHolder")
            .field("value", &self.value.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<V: ModelValue> ValueSource<V> for ValueHolder<V> {
    fn value(&self) -> Option<V> {
        self.value.get()
    }

    fn set_value(&self, value: Option<V>) -> Result<(), SourceError> {
        self.value.set(value);
        Ok(())
    }

    fn subscribe(&self, callback: Box<dyn Fn(&ValueChange<V>)>) -> Subscription {
        self.value.subscribe(move |change| {
            callback(&ValueChange {
                old: change.old.clone(),
                new: change.new.clone(),
            });
        })
    }
}

struct SupplierInner<V> {
    supplier: Box<dyn Fn() -> Option<V>>,
    last: RefCell<Option<V>>,
    changed: Signal<ValueChange<V>>,
}

/// Read-only source computed by a supplier function.
///
/// The supplier is polled by [`value`](ValueSource::value); subscribers are
/// notified only when [`refresh`](Self::refresh) observes a different value.
#[derive(Clone)]
pub struct SupplierSource<V: ModelValue> {
    inner: Rc<SupplierInner<V>>,
}

impl<V: ModelValue> SupplierSource<V> {
    pub fn new(supplier: impl Fn() -> Option<V> + 'static) -> Self {
        let last = supplier();
        Self {
            inner: Rc::new(SupplierInner {
                supplier: Box::new(supplier),
                last: RefCell::new(last),
                changed: Signal::new(),
            }),
        }
    }

    /// Re-read the supplier and publish a change if the value differs.
    /// Returns `true` when a change was published.
    pub fn refresh(&self) -> bool {
        let new = (self.inner.supplier)();
        let old = self.inner.last.replace(new.clone());
        if old == new {
            return false;
        }
        self.inner.changed.emit(&ValueChange { old, new });
        true
    }
}

impl<V: ModelValue> fmt::Debug for SupplierSource<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplierSource")
            .field("last", &self.inner.last.borrow())
            .finish_non_exhaustive()
    }
}

impl<V: ModelValue> ValueSource<V> for SupplierSource<V> {
    fn value(&self) -> Option<V> {
        (self.inner.supplier)()
    }

    fn set_value(&self, _value: Option<V>) -> Result<(), SourceError> {
        Err(SourceError::ReadOnly)
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn subscribe(&self, callback: Box<dyn Fn(&ValueChange<V>)>) -> Subscription {
        self.inner.changed.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn holder_publishes_old_and_new() {
        let holder = ValueHolder::new(Some(1));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = holder.subscribe(Box::new(move |c: &ValueChange<i32>| {
            s.borrow_mut().push((c.old, c.new));
        }));

        holder.set_value(Some(2)).unwrap();
        holder.set_value(Some(2)).unwrap();
        holder.set_value(None).unwrap();
        assert_eq!(*seen.borrow(), vec![(Some(1), Some(2)), (Some(2), None)]);
    }

    #[test]
    fn holder_clones_share_value() {
        let a = ValueHolder::<String>::empty();
        let b = a.clone();
        b.set_value(Some("x".into())).unwrap();
        assert_eq!(a.value().as_deref(), Some("x"));
    }

    #[test]
    fn supplier_is_read_only() {
        let source = SupplierSource::new(|| Some(5));
        assert!(source.is_read_only());
        assert_eq!(source.set_value(Some(1)), Err(SourceError::ReadOnly));
        assert_eq!(source.value(), Some(5));
    }

    #[test]
    fn supplier_refresh_publishes_only_differences() {
        let backing = Rc::new(Cell::new(1));
        let b = Rc::clone(&backing);
        let source = SupplierSource::new(move || Some(b.get()));

        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = source.subscribe(Box::new(move |_: &ValueChange<i32>| h.set(h.get() + 1)));

        assert!(!source.refresh());
        backing.set(2);
        assert!(source.refresh());
        assert!(!source.refresh());
        assert_eq!(hits.get(), 1);
    }
}
