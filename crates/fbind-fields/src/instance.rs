//! Entity-backed value sources.
//!
//! An [`InstanceContainer`] holds the entity a screen is editing. A
//! [`PropertySource`] exposes one of its properties as a [`ValueSource`], so
//! several fields can edit the same entity and see each other's changes.
//!
//! # Invariants
//!
//! 1. A `PropertySource` publishes a change when either the property is
//!    modified or the container item is replaced, and only when the property
//!    value differs under domain equality.
//! 2. Events are emitted after the item borrow is released; subscribers may
//!    read or modify the container.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fbind_runtime::reactive::{Signal, Subscription};

use crate::error::SourceError;
use crate::source::{ValueChange, ValueSource};
use crate::value::ModelValue;

/// The container item was replaced.
#[derive(Debug, Clone)]
pub struct ItemChange<E> {
    pub prev: Option<E>,
    pub item: Option<E>,
}

/// A property of the current item was modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub property: &'static str,
}

struct ContainerInner<E> {
    item: RefCell<Option<E>>,
    item_changed: Signal<ItemChange<E>>,
    property_changed: Signal<PropertyChange>,
}

/// Holds one entity instance with item and property change events.
pub struct InstanceContainer<E> {
    inner: Rc<ContainerInner<E>>,
}

impl<E> Clone for InstanceContainer<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for InstanceContainer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceContainer")
            .field("item", &self.inner.item.borrow())
            .finish()
    }
}

impl<E: Clone + 'static> Default for InstanceContainer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + 'static> InstanceContainer<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ContainerInner {
                item: RefCell::new(None),
                item_changed: Signal::new(),
                property_changed: Signal::new(),
            }),
        }
    }

    #[must_use]
    pub fn with_item(item: E) -> Self {
        let container = Self::new();
        container.inner.item.replace(Some(item));
        container
    }

    /// Clone of the current item.
    #[must_use]
    pub fn item(&self) -> Option<E> {
        self.inner.item.borrow().clone()
    }

    /// Replace the item; every property source re-publishes its value.
    pub fn set_item(&self, item: Option<E>) {
        let prev = self.inner.item.replace(item.clone());
        self.inner.item_changed.emit(&ItemChange { prev, item });
    }

    /// Mutate the current item and announce `property` as changed.
    pub fn modify(&self, property: &'static str, f: impl FnOnce(&mut E)) -> Result<(), SourceError> {
        {
            let mut item = self.inner.item.borrow_mut();
            let item = item.as_mut().ok_or(SourceError::NoItem)?;
            f(item);
        }
        self.inner.property_changed.emit(&PropertyChange { property });
        Ok(())
    }

    /// Read through the current item without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(Option<&E>) -> R) -> R {
        f(self.inner.item.borrow().as_ref())
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_item(&self, callback: impl Fn(&ItemChange<E>) + 'static) -> Subscription {
        self.inner.item_changed.subscribe(callback)
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_property(&self, callback: impl Fn(&PropertyChange) + 'static) -> Subscription {
        self.inner.property_changed.subscribe(callback)
    }

    /// Expose `property` as a writable value source.
    pub fn property<V: ModelValue>(
        &self,
        property: &'static str,
        getter: impl Fn(&E) -> Option<V> + 'static,
        setter: impl Fn(&mut E, Option<V>) + 'static,
    ) -> PropertySource<E, V> {
        PropertySource {
            container: self.clone(),
            property,
            getter: Rc::new(getter),
            setter: Some(Rc::new(setter)),
        }
    }

    /// Expose `property` as a read-only value source.
    pub fn read_only_property<V: ModelValue>(
        &self,
        property: &'static str,
        getter: impl Fn(&E) -> Option<V> + 'static,
    ) -> PropertySource<E, V> {
        PropertySource {
            container: self.clone(),
            property,
            getter: Rc::new(getter),
            setter: None,
        }
    }
}

type Getter<E, V> = Rc<dyn Fn(&E) -> Option<V>>;
type Setter<E, V> = Rc<dyn Fn(&mut E, Option<V>)>;

/// One property of an [`InstanceContainer`] item as a [`ValueSource`].
pub struct PropertySource<E, V> {
    container: InstanceContainer<E>,
    property: &'static str,
    getter: Getter<E, V>,
    setter: Option<Setter<E, V>>,
}

impl<E, V> Clone for PropertySource<E, V> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            property: self.property,
            getter: Rc::clone(&self.getter),
            setter: self.setter.clone(),
        }
    }
}

impl<E, V> fmt::Debug for PropertySource<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySource")
            .field("property", &self.property)
            .field("read_only", &self.setter.is_none())
            .finish()
    }
}

impl<E: Clone + 'static, V: ModelValue> PropertySource<E, V> {
    #[must_use]
    pub fn property_name(&self) -> &'static str {
        self.property
    }
}

impl<E: Clone + 'static, V: ModelValue> ValueSource<V> for PropertySource<E, V> {
    fn value(&self) -> Option<V> {
        self.container.read(|item| item.and_then(|e| (self.getter)(e)))
    }

    fn set_value(&self, value: Option<V>) -> Result<(), SourceError> {
        let setter = self.setter.as_ref().ok_or(SourceError::ReadOnly)?;
        self.container.modify(self.property, |e| setter(e, value))
    }

    fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }

    fn subscribe(&self, callback: Box<dyn Fn(&ValueChange<V>)>) -> Subscription {
        let last = Rc::new(RefCell::new(self.value()));
        let republish: Rc<dyn Fn()> = {
            let source = self.clone();
            Rc::new(move || {
                let new = source.value();
                let old = last.replace(new.clone());
                if old != new {
                    callback(&ValueChange { old, new });
                }
            })
        };

        let on_item = Rc::clone(&republish);
        let property = self.property;
        Subscription::combine([
            self.container.subscribe_item(move |_| on_item()),
            self.container.subscribe_property(move |change| {
                if change.property == property {
                    republish();
                }
            }),
        ])
    }
}
