#![forbid(unsafe_code)]

//! Change-notification primitives for the binding core.
//!
//! - [`Signal`]: an ordered publish/subscribe channel for events of type `E`.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Observable`]: a shared, version-tracked value whose changes are
//!   published as [`Change`] events.
//! - [`BindingScope`]: holds every subscription owned by one component.
//!
//! # Architecture
//!
//! Everything is `Rc<RefCell<..>>` based: all binding work happens on the one
//! UI dispatch thread, so there is no locking. Subscribers are stored as
//! `Weak` callbacks; the strong reference lives in the [`Subscription`]. A
//! dropped subscription is therefore dead immediately and pruned lazily
//! during the next emission.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    emission, including an emission already in progress.
//! 3. Emission is synchronous: every live subscriber has run before
//!    [`Signal::emit`] returns.
//! 4. Setting an `Observable` to an equal value is a no-op (no version bump,
//!    no notifications).

pub mod observable;
pub mod scope;
pub mod signal;

pub use observable::{Change, Observable};
pub use scope::BindingScope;
pub use signal::{Signal, Subscription};
