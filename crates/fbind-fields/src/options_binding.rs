//! Options binding lifecycle, mirroring [`ValueBinding`](crate::ValueBinding)
//! for an [`Options`] provider feeding a selection field.
//!
//! `activate` subscribes to the provider and returns its full item list in
//! provider order. Every later change hands the callback the change and the
//! provider's complete, freshly read item list.

use std::fmt;
use std::rc::Rc;

use fbind_runtime::reactive::Subscription;

use crate::binding::BindingState;
use crate::error::BindingStateError;
use crate::options::{Options, OptionsChange};

/// Managed subscription between one options provider and one selection field.
pub struct OptionsBinding<I> {
    options: Option<Rc<dyn Options<I>>>,
    subscription: Option<Subscription>,
}

impl<I> Default for OptionsBinding<I> {
    fn default() -> Self {
        Self {
            options: None,
            subscription: None,
        }
    }
}

impl<I: 'static> fmt::Debug for OptionsBinding<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsBinding")
            .field("state", &self.state())
            .finish()
    }
}

impl<I: 'static> OptionsBinding<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> BindingState {
        match (&self.options, &self.subscription) {
            (None, _) => BindingState::Unbound,
            (Some(_), None) => BindingState::Bound,
            (Some(_), Some(_)) => BindingState::Active,
        }
    }

    pub fn bind(&mut self, options: Rc<dyn Options<I>>) -> Result<(), BindingStateError> {
        if self.options.is_some() {
            return Err(BindingStateError::AlreadyBound);
        }
        self.options = Some(options);
        Ok(())
    }

    /// Subscribe to the bound provider and return its current items.
    pub fn activate(
        &mut self,
        on_change: impl Fn(&OptionsChange<I>, Vec<I>) + 'static,
    ) -> Result<Vec<I>, BindingStateError> {
        let options = self.options.as_ref().ok_or(BindingStateError::NotBound)?;
        if self.subscription.is_some() {
            return Err(BindingStateError::AlreadyActive);
        }
        let provider = Rc::downgrade(options);
        let subscription = options.subscribe(Box::new(move |change: &OptionsChange<I>| {
            if let Some(provider) = provider.upgrade() {
                on_change(change, provider.items());
            }
        }));
        self.subscription = Some(subscription);
        Ok(options.items())
    }

    /// Drop the subscription and the provider reference. Idempotent.
    pub fn unbind(&mut self) {
        self.subscription = None;
        self.options = None;
    }

    #[must_use]
    pub fn options(&self) -> Option<Rc<dyn Options<I>>> {
        self.options.clone()
    }
}
