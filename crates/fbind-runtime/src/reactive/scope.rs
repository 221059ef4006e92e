#![forbid(unsafe_code)]

//! Lifecycle management for groups of subscriptions.
//!
//! A [`BindingScope`] collects every [`Subscription`] owned by one logical
//! owner (a field, a container). Releasing the scope cleanly disconnects the
//! owner from all sources, so detach and rebind can never leave a dangling
//! callback behind.
//!
//! # Invariants
//!
//! 1. Subscriptions are released in reverse registration order on drop.
//! 2. After `clear()` or drop, no callback from this scope will fire.
//! 3. `len()` is always the number of held subscriptions.

use std::fmt;

use super::observable::{Change, Observable};
use super::signal::{Signal, Subscription};

/// Collects subscriptions for a logical scope.
#[derive(Default)]
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `sub` until the scope is cleared or dropped.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to a signal within this scope.
    pub fn listen<E: 'static>(
        &mut self,
        signal: &Signal<E>,
        callback: impl Fn(&E) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(signal.subscribe(callback));
        self
    }

    /// Subscribe to an observable within this scope.
    pub fn observe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&Change<T>) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(source.subscribe(callback));
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the scope holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription now; the scope stays reusable.
    pub fn clear(&mut self) {
        while let Some(sub) = self.subscriptions.pop() {
            drop(sub);
        }
    }
}

impl Drop for BindingScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("len", &self.subscriptions.len())
            .finish()
    }
}
