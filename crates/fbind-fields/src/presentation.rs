//! Presentation capabilities a field wraps.
//!
//! A widget adapter implements [`Presentation`] (value get/set plus change
//! notification) and, for selection widgets, [`OptionsPresentation`]. The
//! in-memory adapters here stand in for real widgets in tests and headless
//! use.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use fbind_runtime::reactive::{Signal, Subscription};

/// The value side of a display widget.
pub trait Presentation<P> {
    fn value(&self) -> P;

    /// Show `value`. Adapters may or may not raise their change
    /// notification in response; fields cope with both.
    fn set_value(&self, value: P);

    /// Subscribe to value changes.
    fn subscribe_on_change(&self, callback: Box<dyn Fn(&P)>) -> Subscription;

    /// Reflect the field's effective editable state.
    fn set_read_only(&self, _read_only: bool) {}
}

/// The item side of a selection widget.
pub trait OptionsPresentation<I> {
    /// Replace the selectable items, keeping their order.
    fn set_items(&self, items: Vec<I>);

    fn items(&self) -> Vec<I>;
}

struct InputInner<P> {
    value: RefCell<P>,
    read_only: Cell<bool>,
    changed: Signal<P>,
}

/// Headless text or value input.
///
/// Like most toolkits, `set_value` raises the change notification whenever
/// the shown value changes, whether the caller is the user or the program.
pub struct MemoryInput<P> {
    inner: Rc<InputInner<P>>,
}

impl<P> Clone for MemoryInput<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for MemoryInput<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryInput")
            .field("value", &self.inner.value.borrow())
            .field("read_only", &self.inner.read_only.get())
            .finish()
    }
}

impl<P: Clone + Default + PartialEq + 'static> Default for MemoryInput<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone + Default + PartialEq + 'static> MemoryInput<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(InputInner {
                value: RefCell::new(P::default()),
                read_only: Cell::new(false),
                changed: Signal::new(),
            }),
        }
    }

    /// Simulate the user typing `value`. Ignored while read-only; returns
    /// whether the input accepted it.
    pub fn user_input(&self, value: P) -> bool {
        if self.inner.read_only.get() {
            return false;
        }
        self.show(value);
        true
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.inner.read_only.get()
    }

    /// Number of live change subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.subscriber_count()
    }

    fn show(&self, value: P) {
        if *self.inner.value.borrow() == value {
            return;
        }
        self.inner.value.replace(value.clone());
        self.inner.changed.emit(&value);
    }
}

impl<P: Clone + Default + PartialEq + 'static> Presentation<P> for MemoryInput<P> {
    fn value(&self) -> P {
        self.inner.value.borrow().clone()
    }

    fn set_value(&self, value: P) {
        self.show(value);
    }

    fn subscribe_on_change(&self, callback: Box<dyn Fn(&P)>) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.set(read_only);
    }
}

/// Headless selection widget: an input whose value is the selection plus
/// the list of selectable items.
pub struct MemorySelect<P, I> {
    input: MemoryInput<P>,
    items: Rc<RefCell<Vec<I>>>,
}

impl<P, I> Clone for MemorySelect<P, I> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            items: Rc::clone(&self.items),
        }
    }
}

impl<P: fmt::Debug, I: fmt::Debug> fmt::Debug for MemorySelect<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySelect")
            .field("selection", &self.input.inner.value.borrow())
            .field("items", &self.items.borrow())
            .finish()
    }
}

impl<P: Clone + Default + PartialEq + 'static, I: Clone> Default for MemorySelect<P, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone + Default + PartialEq + 'static, I: Clone> MemorySelect<P, I> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: MemoryInput::new(),
            items: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Simulate the user picking `selection`.
    pub fn select(&self, selection: P) -> bool {
        self.input.user_input(selection)
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.input.is_read_only()
    }
}

impl<P: Clone + Default + PartialEq + 'static, I: Clone> Presentation<P> for MemorySelect<P, I> {
    fn value(&self) -> P {
        self.input.value()
    }

    fn set_value(&self, value: P) {
        self.input.set_value(value);
    }

    fn subscribe_on_change(&self, callback: Box<dyn Fn(&P)>) -> Subscription {
        self.input.subscribe_on_change(callback)
    }

    fn set_read_only(&self, read_only: bool) {
        self.input.set_read_only(read_only);
    }
}

impl<P, I: Clone> OptionsPresentation<I> for MemorySelect<P, I> {
    fn set_items(&self, items: Vec<I>) {
        self.items.replace(items);
    }

    fn items(&self) -> Vec<I> {
        self.items.borrow().clone()
    }
}
