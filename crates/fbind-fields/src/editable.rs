//! Editable cascade from containers to their descendants.
//!
//! Every field and container keeps an [`EditableState`]:
//!
//! ```text
//! effective = local && parent_effective && !source_read_only
//! ```
//!
//! A child attached to an [`EditableParent`] holds one [`Subscription`] to
//! the parent's editable-change signal. Re-attaching replaces it, detaching
//! drops it; either way no further cascade events reach the child.
//!
//! # Invariants
//!
//! 1. Propagation is synchronous. When `set_editable` returns, every
//!    descendant's effective state reflects the new value.
//! 2. The change signal fires only when the effective value changes.
//! 3. A parent holds no strong reference to its children's cascade handlers.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use fbind_runtime::reactive::{Signal, Subscription};

/// A component whose effective editable state cascades to its children.
pub trait EditableParent {
    /// Effective editable state, accounting for this component's own parents.
    fn is_editable_with_parent(&self) -> bool;

    /// Subscribe to changes of the effective editable state.
    fn subscribe_editable_change(&self, callback: Box<dyn Fn(&bool)>) -> Subscription;
}

/// Local flag, inherited flag and derived effective flag of one component.
pub struct EditableState {
    local: Cell<bool>,
    parent: Cell<bool>,
    source_read_only: Cell<bool>,
    effective: Cell<bool>,
    changed: Signal<bool>,
    parent_sub: RefCell<Option<Subscription>>,
}

impl Default for EditableState {
    fn default() -> Self {
        Self {
            local: Cell::new(true),
            parent: Cell::new(true),
            source_read_only: Cell::new(false),
            effective: Cell::new(true),
            changed: Signal::new(),
            parent_sub: RefCell::new(None),
        }
    }
}

impl fmt::Debug for EditableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditableState")
            .field("local", &self.local.get())
            .field("parent", &self.parent.get())
            .field("source_read_only", &self.source_read_only.get())
            .field("effective", &self.effective.get())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl EditableState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The local flag, as last set by `set_editable`.
    #[must_use]
    pub fn local(&self) -> bool {
        self.local.get()
    }

    /// The derived flag the widget sees.
    #[must_use]
    pub fn effective(&self) -> bool {
        self.effective.get()
    }

    /// Whether the state currently follows a parent.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.parent_sub.borrow().is_some()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }

    /// Number of live change subscriptions (one per attached child plus
    /// external listeners).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.changed.subscriber_count()
    }

    /// Returns the new effective value when it changed.
    pub fn set_local(&self, editable: bool) -> Option<bool> {
        self.local.set(editable);
        self.recompute()
    }

    pub fn set_parent(&self, editable: bool) -> Option<bool> {
        self.parent.set(editable);
        self.recompute()
    }

    pub fn set_source_read_only(&self, read_only: bool) -> Option<bool> {
        self.source_read_only.set(read_only);
        self.recompute()
    }

    fn recompute(&self) -> Option<bool> {
        let effective = self.local.get() && self.parent.get() && !self.source_read_only.get();
        (self.effective.replace(effective) != effective).then_some(effective)
    }
}

/// Owner of an [`EditableState`] that reacts to its effective changes.
pub(crate) trait CascadeTarget: 'static {
    fn editable_state(&self) -> &EditableState;

    /// Called before the change signal fires, so the owner's own view (e.g.
    /// a widget's read-only flag) is updated before descendants run.
    fn on_effective_editable_changed(&self, editable: bool);
}

/// Publish an effective change returned by one of the `EditableState`
/// setters.
pub(crate) fn propagate<T: CascadeTarget + ?Sized>(target: &T, change: Option<bool>) {
    if let Some(editable) = change {
        target.on_effective_editable_changed(editable);
        target.editable_state().changed.emit(&editable);
    }
}

/// Follow `parent`'s effective editable state, replacing any previous parent.
pub(crate) fn attach<T: CascadeTarget>(target: &Rc<T>, parent: &dyn EditableParent) {
    let weak: Weak<T> = Rc::downgrade(target);
    let sub = parent.subscribe_editable_change(Box::new(move |editable: &bool| {
        if let Some(target) = weak.upgrade() {
            let change = target.editable_state().set_parent(*editable);
            propagate(&*target, change);
        }
    }));
    let state = target.editable_state();
    state.parent_sub.replace(Some(sub));
    let change = state.set_parent(parent.is_editable_with_parent());
    propagate(&**target, change);
}

/// Stop following the current parent. A detached component behaves as if
/// its parent were editable.
pub(crate) fn detach<T: CascadeTarget + ?Sized>(target: &T) {
    let state = target.editable_state();
    state.parent_sub.take();
    let change = state.set_parent(true);
    propagate(target, change);
}
