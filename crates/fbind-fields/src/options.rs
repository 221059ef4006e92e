//! Options providers: the selectable items of a selection field.
//!
//! An [`Options`] provider is externally owned, may be shared by several
//! selection fields, and publishes an [`OptionsChange`] whenever its item
//! list changes. Subscribers re-read [`items`](Options::items) after each
//! event; the payload is informational.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fbind_runtime::reactive::{Signal, Subscription};

/// What changed in an options provider.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsChange<I> {
    Added(Vec<I>),
    Removed(Vec<I>),
    /// The whole list was replaced.
    Replaced,
}

/// Supplier of the items a selection field may choose from.
pub trait Options<I> {
    /// Current items, in display order.
    fn items(&self) -> Vec<I>;

    /// Subscribe to item list changes.
    fn subscribe(&self, callback: Box<dyn Fn(&OptionsChange<I>)>) -> Subscription;

    /// Display caption for `item`, when the provider knows one.
    fn caption_of(&self, _item: &I) -> Option<String> {
        None
    }
}

struct ListInner<I> {
    items: RefCell<Vec<I>>,
    changed: Signal<OptionsChange<I>>,
}

/// Ordered list of items.
pub struct ListOptions<I> {
    inner: Rc<ListInner<I>>,
}

impl<I> Clone for ListOptions<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: fmt::Debug> fmt::Debug for ListOptions<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListOptions")
            .field("items", &self.inner.items.borrow())
            .finish()
    }
}

impl<I: Clone + PartialEq + 'static> ListOptions<I> {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = I>) -> Self {
        Self {
            inner: Rc::new(ListInner {
                items: RefCell::new(items.into_iter().collect()),
                changed: Signal::new(),
            }),
        }
    }

    pub fn add(&self, item: I) {
        self.inner.items.borrow_mut().push(item.clone());
        self.inner.changed.emit(&OptionsChange::Added(vec![item]));
    }

    /// Remove every occurrence of `item`. Returns `false` if none existed.
    pub fn remove(&self, item: &I) -> bool {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            let before = items.len();
            items.retain(|i| i != item);
            before != items.len()
        };
        if removed {
            self.inner
                .changed
                .emit(&OptionsChange::Removed(vec![item.clone()]));
        }
        removed
    }

    pub fn set_items(&self, items: impl IntoIterator<Item = I>) {
        self.inner.items.replace(items.into_iter().collect());
        self.inner.changed.emit(&OptionsChange::Replaced);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.subscriber_count()
    }
}

impl<I: Clone + PartialEq + 'static> Options<I> for ListOptions<I> {
    fn items(&self) -> Vec<I> {
        self.inner.items.borrow().clone()
    }

    fn subscribe(&self, callback: Box<dyn Fn(&OptionsChange<I>)>) -> Subscription {
        self.inner.changed.subscribe(callback)
    }
}

struct MapInner<I> {
    entries: RefCell<Vec<(String, I)>>,
    changed: Signal<OptionsChange<I>>,
}

/// Items keyed by display caption, kept in insertion order.
pub struct MapOptions<I> {
    inner: Rc<MapInner<I>>,
}

impl<I> Clone for MapOptions<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: fmt::Debug> fmt::Debug for MapOptions<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOptions")
            .field("entries", &self.inner.entries.borrow())
            .finish()
    }
}

impl<I: Clone + PartialEq + 'static> MapOptions<I> {
    #[must_use]
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (S, I)>) -> Self {
        Self {
            inner: Rc::new(MapInner {
                entries: RefCell::new(
                    entries
                        .into_iter()
                        .map(|(caption, item)| (caption.into(), item))
                        .collect(),
                ),
                changed: Signal::new(),
            }),
        }
    }

    /// Insert or replace the item under `caption`.
    pub fn insert(&self, caption: impl Into<String>, item: I) {
        let caption = caption.into();
        let replaced = {
            let mut entries = self.inner.entries.borrow_mut();
            match entries.iter_mut().find(|(c, _)| *c == caption) {
                Some(entry) => Some(std::mem::replace(&mut entry.1, item.clone())),
                None => {
                    entries.push((caption, item.clone()));
                    None
                }
            }
        };
        match replaced {
            Some(_) => self.inner.changed.emit(&OptionsChange::Replaced),
            None => self.inner.changed.emit(&OptionsChange::Added(vec![item])),
        }
    }

    /// Remove the item under `caption`, returning it.
    pub fn remove(&self, caption: &str) -> Option<I> {
        let removed = {
            let mut entries = self.inner.entries.borrow_mut();
            let pos = entries.iter().position(|(c, _)| c == caption)?;
            entries.remove(pos).1
        };
        self.inner
            .changed
            .emit(&OptionsChange::Removed(vec![removed.clone()]));
        Some(removed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<I: Clone + PartialEq + 'static> Options<I> for MapOptions<I> {
    fn items(&self) -> Vec<I> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    fn subscribe(&self, callback: Box<dyn Fn(&OptionsChange<I>)>) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    fn caption_of(&self, item: &I) -> Option<String> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find(|(_, i)| i == item)
            .map(|(caption, _)| caption.clone())
    }
}
