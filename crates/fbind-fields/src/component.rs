//! Component tree: containers, child attachment and form-wide validation.
//!
//! A [`Container`] is an [`EditableParent`] for its children. Adding a
//! child attaches it (the child subscribes to the container's editable
//! changes and derives its effective state at once); removing it detaches.
//! Containers nest, so a toggle on the root reaches every descendant before
//! `set_editable` returns.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fbind_runtime::reactive::Subscription;

use crate::editable::{self, CascadeTarget, EditableParent, EditableState};
use crate::error::ValidationErrors;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique component identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    pub(crate) fn next() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the component tree.
pub trait Component {
    fn id(&self) -> ComponentId;

    fn caption(&self) -> Option<String>;

    fn is_visible(&self) -> bool;

    /// Validate this component (and its descendants) and record failures.
    fn collect_errors(&self, errors: &mut ValidationErrors);

    /// Follow `parent`'s editable state, replacing any previous parent.
    fn attach_to(&self, parent: &dyn EditableParent);

    /// Stop following the parent.
    fn detach(&self);

    fn is_editable_with_parent(&self) -> bool;
}

struct ContainerInner {
    id: ComponentId,
    caption: RefCell<Option<String>>,
    visible: Cell<bool>,
    editable: EditableState,
    children: RefCell<Vec<Box<dyn Component>>>,
}

impl CascadeTarget for ContainerInner {
    fn editable_state(&self) -> &EditableState {
        &self.editable
    }

    fn on_effective_editable_changed(&self, editable: bool) {
        tracing::trace!(container = %self.id, editable, "cascading editable change");
    }
}

/// Groups components and cascades its editable state to them.
///
/// Cloning yields another handle to the same container.
#[derive(Clone)]
pub struct Container {
    inner: Rc<ContainerInner>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.inner.id)
            .field("caption", &self.inner.caption.borrow())
            .field("editable", &self.inner.editable)
            .field("children", &self.len())
            .finish()
    }
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ContainerInner {
                id: ComponentId::next(),
                caption: RefCell::new(None),
                visible: Cell::new(true),
                editable: EditableState::new(),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn with_caption(caption: impl Into<String>) -> Self {
        let container = Self::new();
        container.inner.caption.replace(Some(caption.into()));
        container
    }

    /// The local editable flag.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.inner.editable.local()
    }

    /// Local flag AND the container's own parents.
    #[must_use]
    pub fn is_editable_with_parent(&self) -> bool {
        self.inner.editable.effective()
    }

    /// Set the local flag; descendants observe the new effective state
    /// before this returns.
    pub fn set_editable(&self, editable: bool) {
        let change = self.inner.editable.set_local(editable);
        editable::propagate(&*self.inner, change);
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_editable_change(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.inner.editable.subscribe(callback)
    }

    pub fn set_visible(&self, visible: bool) {
        self.inner.visible.set(visible);
    }

    /// Attach `child` and take ownership of its handle.
    pub fn add(&self, child: impl Component + 'static) {
        child.attach_to(self);
        tracing::debug!(container = %self.inner.id, child = %child.id(), "child added");
        self.inner.children.borrow_mut().push(Box::new(child));
    }

    /// Detach and drop the child with `id`. Returns `false` if no such
    /// direct child exists.
    pub fn remove(&self, id: ComponentId) -> bool {
        let child = {
            let mut children = self.inner.children.borrow_mut();
            let Some(pos) = children.iter().position(|c| c.id() == id) else {
                return false;
            };
            children.remove(pos)
        };
        child.detach();
        tracing::debug!(container = %self.inner.id, child = %id, "child removed");
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.children.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every visible descendant, depth-first, collecting all
    /// failures instead of stopping at the first.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.collect_errors(&mut errors);
        if !errors.is_empty() {
            tracing::debug!(container = %self.inner.id, failures = errors.len(), "validation failed");
        }
        errors.into_result()
    }
}

impl EditableParent for Container {
    fn is_editable_with_parent(&self) -> bool {
        self.inner.editable.effective()
    }

    fn subscribe_editable_change(&self, callback: Box<dyn Fn(&bool)>) -> Subscription {
        self.inner.editable.subscribe(callback)
    }
}

impl Component for Container {
    fn id(&self) -> ComponentId {
        self.inner.id
    }

    fn caption(&self) -> Option<String> {
        self.inner.caption.borrow().clone()
    }

    fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    fn collect_errors(&self, errors: &mut ValidationErrors) {
        if !self.inner.visible.get() {
            return;
        }
        let children = self.inner.children.borrow();
        for child in children.iter().filter(|c| c.is_visible()) {
            child.collect_errors(errors);
        }
    }

    fn attach_to(&self, parent: &dyn EditableParent) {
        editable::attach(&self.inner, parent);
    }

    fn detach(&self) {
        editable::detach(&*self.inner);
    }

    fn is_editable_with_parent(&self) -> bool {
        self.inner.editable.effective()
    }
}
