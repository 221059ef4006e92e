//! Model value traits: emptiness, domain equality and length.
//!
//! Field and binding code compares model values with `PartialEq`, which is
//! the *domain* equality. Plain values compare structurally; entity-like
//! values are wrapped in [`ById`] so that two distinct instances describing
//! the same entity are equal.

use std::fmt;
use std::ops::Deref;

use chrono::NaiveDate;

/// A value a field can hold as its model value.
pub trait ModelValue: Clone + PartialEq + fmt::Debug + 'static {
    /// Whether the value counts as "empty" for the required check.
    ///
    /// `None` is always empty; this decides for present values.
    fn is_empty_value(&self) -> bool {
        false
    }
}

/// `None`, or a present value that reports itself empty.
#[must_use]
pub fn is_empty<V: ModelValue>(value: Option<&V>) -> bool {
    value.is_none_or(ModelValue::is_empty_value)
}

impl ModelValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: ModelValue> ModelValue for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! plain_model_value {
    ($($ty:ty),* $(,)?) => {
        $(impl ModelValue for $ty {})*
    };
}

plain_model_value!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, NaiveDate);

/// An object with an identity or business key.
pub trait Entity: Clone + fmt::Debug + 'static {
    type Id: PartialEq + Clone + fmt::Debug;

    /// The identity used for domain equality.
    fn id(&self) -> Self::Id;
}

/// Compares an [`Entity`] by its id instead of its full state.
#[derive(Clone)]
pub struct ById<E>(pub E);

impl<E: Entity> PartialEq for ById<E> {
    fn eq(&self, other: &Self) -> bool {
        self.0.id() == other.0.id()
    }
}

impl<E: Entity> fmt::Debug for ById<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ById").field(&self.0.id()).finish()
    }
}

impl<E> Deref for ById<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.0
    }
}

impl<E: Entity> ModelValue for ById<E> {}

/// Values with a length, checked by
/// [`SizeValidator`](crate::validator::SizeValidator).
pub trait HasLength {
    fn length(&self) -> usize;
}

impl HasLength for String {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl<T> HasLength for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}
