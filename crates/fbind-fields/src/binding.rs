//! Value binding lifecycle: `Unbound → Bound → Active → Unbound`.
//!
//! A [`ValueBinding`] connects one [`ValueSource`] to one field. `bind`
//! stores the source without subscribing, `activate` subscribes and hands
//! back the current source value for the field to display, `unbind` drops
//! the subscription and the source reference.
//!
//! # Invariants
//!
//! 1. At most one subscription per binding; activating twice is an error.
//! 2. After `unbind` the source holds no callback of this binding.
//! 3. Writes made through [`BindingWriter`] are not echoed back to the
//!    binding's own change callback.
//!
//! # Failure Modes
//!
//! - `bind` while bound or active: [`BindingStateError::AlreadyBound`].
//! - `activate` while unbound: [`BindingStateError::NotBound`].
//! - `activate` while active: [`BindingStateError::AlreadyActive`].
//! - `unbind` while unbound: no-op.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use fbind_runtime::reactive::Subscription;

use crate::error::{BindingStateError, SourceError, WriteError};
use crate::source::{ValueChange, ValueSource};
use crate::value::ModelValue;

/// Lifecycle state of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingState {
    Unbound,
    Bound,
    Active,
}

/// Managed subscription between one value source and one field.
pub struct ValueBinding<V: ModelValue> {
    source: Option<Rc<dyn ValueSource<V>>>,
    subscription: Option<Subscription>,
    writing: Rc<Cell<bool>>,
}

impl<V: ModelValue> Default for ValueBinding<V> {
    fn default() -> Self {
        Self {
            source: None,
            subscription: None,
            writing: Rc::new(Cell::new(false)),
        }
    }
}

impl<V: ModelValue> fmt::Debug for ValueBinding<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBinding")
            .field("state", &self.state())
            .finish()
    }
}

impl<V: ModelValue> ValueBinding<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> BindingState {
        match (&self.source, &self.subscription) {
            (None, _) => BindingState::Unbound,
            (Some(_), None) => BindingState::Bound,
            (Some(_), Some(_)) => BindingState::Active,
        }
    }

    /// Store `source` without subscribing.
    pub fn bind(&mut self, source: Rc<dyn ValueSource<V>>) -> Result<(), BindingStateError> {
        if self.source.is_some() {
            return Err(BindingStateError::AlreadyBound);
        }
        self.source = Some(source);
        Ok(())
    }

    /// Subscribe to the bound source and return its current value.
    ///
    /// `on_change` receives source changes, except those caused by this
    /// binding's own [`BindingWriter`].
    pub fn activate(
        &mut self,
        on_change: impl Fn(&ValueChange<V>) + 'static,
    ) -> Result<Option<V>, BindingStateError> {
        let source = self.source.as_ref().ok_or(BindingStateError::NotBound)?;
        if self.subscription.is_some() {
            return Err(BindingStateError::AlreadyActive);
        }
        let writing = Rc::clone(&self.writing);
        let subscription = source.subscribe(Box::new(move |change: &ValueChange<V>| {
            if writing.get() {
                tracing::trace!("suppressed echo of own write");
                return;
            }
            on_change(change);
        }));
        self.subscription = Some(subscription);
        Ok(source.value())
    }

    /// Drop the subscription and the source reference. Idempotent.
    pub fn unbind(&mut self) {
        self.subscription = None;
        self.source = None;
    }

    #[must_use]
    pub fn source(&self) -> Option<Rc<dyn ValueSource<V>>> {
        self.source.clone()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.is_read_only())
    }

    /// A write handle usable after the binding's borrow is released.
    pub fn writer(&self) -> Result<BindingWriter<V>, BindingStateError> {
        match (&self.source, &self.subscription) {
            (Some(source), Some(_)) => Ok(BindingWriter {
                source: Rc::clone(source),
                writing: Rc::clone(&self.writing),
            }),
            (Some(_), None) => Err(BindingStateError::NotActive),
            (None, _) => Err(BindingStateError::NotBound),
        }
    }
}

/// Writes a field value back to an active binding's source.
pub struct BindingWriter<V: ModelValue> {
    source: Rc<dyn ValueSource<V>>,
    writing: Rc<Cell<bool>>,
}

impl<V: ModelValue> fmt::Debug for BindingWriter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingWriter").finish_non_exhaustive()
    }
}

impl<V: ModelValue> BindingWriter<V> {
    /// Write `value` unless the source already holds an equal value.
    /// Returns whether the source was written.
    pub fn write(&self, value: Option<V>) -> Result<bool, WriteError> {
        if self.source.value() == value {
            return Ok(false);
        }
        if self.source.is_read_only() {
            return Err(SourceError::ReadOnly.into());
        }
        let previous = self.writing.replace(true);
        let result = self.source.set_value(value);
        self.writing.set(previous);
        result?;
        Ok(true)
    }

    /// The source's current value; differs from the last write when the
    /// source or one of its subscribers normalized it.
    #[must_use]
    pub fn source_value(&self) -> Option<V> {
        self.source.value()
    }
}
