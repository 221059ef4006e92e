#![forbid(unsafe_code)]

//! Reactive runtime for fbind: signals, observables and the locale context.

pub mod locale;
pub mod reactive;

pub use locale::{LocaleContext, LocaleOverride};
pub use reactive::{BindingScope, Change, Observable, Signal, Subscription};
