//! Model ↔ presentation conversion.
//!
//! A [`Converter`] maps a model value (`Option<V>`) to the value a widget
//! understands (`P`) and back. `to_presentation` is total; `to_model` may
//! fail with a [`ConversionError`] whose message is already localized.

use std::fmt;
use std::marker::PhantomData;

use fbind_i18n::defaults::keys;

use crate::context::FieldContext;
use crate::error::ConversionError;
use crate::value::ModelValue;

/// Bidirectional mapping between model values and presentation values.
pub trait Converter<V, P> {
    /// Model → presentation. `None` maps to the widget's empty state.
    fn to_presentation(&self, value: Option<&V>, cx: &FieldContext) -> P;

    /// Presentation → model.
    fn to_model(&self, presentation: &P, cx: &FieldContext) -> Result<Option<V>, ConversionError>;

    /// Catalog key of the type-specific "required" message.
    fn required_message_key(&self) -> &'static str {
        keys::REQUIRED
    }
}

/// Passes the model value through unchanged; used by selection widgets whose
/// presentation value is the model value itself.
pub struct IdentityConverter<V> {
    required_key: &'static str,
    _marker: PhantomData<fn() -> V>,
}

impl<V> IdentityConverter<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            required_key: keys::REQUIRED,
            _marker: PhantomData,
        }
    }

    /// Identity conversion whose required message asks for a selection.
    #[must_use]
    pub fn for_selection() -> Self {
        Self {
            required_key: keys::REQUIRED_SELECTION,
            _marker: PhantomData,
        }
    }
}

impl<V> Default for IdentityConverter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for IdentityConverter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConverter")
            .field("required_key", &self.required_key)
            .finish()
    }
}

impl<V: ModelValue> Converter<V, Option<V>> for IdentityConverter<V> {
    fn to_presentation(&self, value: Option<&V>, _cx: &FieldContext) -> Option<V> {
        value.cloned()
    }

    fn to_model(&self, presentation: &Option<V>, _cx: &FieldContext) -> Result<Option<V>, ConversionError> {
        Ok(presentation.clone())
    }

    fn required_message_key(&self) -> &'static str {
        self.required_key
    }
}

type ToPresentation<V, P> = Box<dyn Fn(Option<&V>, &FieldContext) -> P>;
type ToModel<V, P> = Box<dyn Fn(&P, &FieldContext) -> Result<Option<V>, ConversionError>>;

/// Converter assembled from two closures.
pub struct FnConverter<V, P> {
    to_presentation: ToPresentation<V, P>,
    to_model: ToModel<V, P>,
}

impl<V, P> FnConverter<V, P> {
    pub fn new(
        to_presentation: impl Fn(Option<&V>, &FieldContext) -> P + 'static,
        to_model: impl Fn(&P, &FieldContext) -> Result<Option<V>, ConversionError> + 'static,
    ) -> Self {
        Self {
            to_presentation: Box::new(to_presentation),
            to_model: Box::new(to_model),
        }
    }
}

impl<V, P> fmt::Debug for FnConverter<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter").finish_non_exhaustive()
    }
}

impl<V, P> Converter<V, P> for FnConverter<V, P> {
    fn to_presentation(&self, value: Option<&V>, cx: &FieldContext) -> P {
        (self.to_presentation)(value, cx)
    }

    fn to_model(&self, presentation: &P, cx: &FieldContext) -> Result<Option<V>, ConversionError> {
        (self.to_model)(presentation, cx)
    }
}
