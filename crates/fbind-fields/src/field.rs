//! The bindable field.
//!
//! A [`Field`] keeps a model value (`Option<V>`) in step with a presentation
//! widget (`P`) and, optionally, a [`ValueSource`]:
//!
//! ```text
//!   set_value / set_value_from_user ──► internal value ──► widget
//!                                            │
//!   widget change ──► to_model ──────────────┤
//!                                            ├──► source write-back
//!   source change ───────────────────────────┘──► value change event
//! ```
//!
//! # Invariants
//!
//! 1. The internal value is the last value accepted through `set_value`,
//!    `set_value_from_user`, a convertible widget edit or a source change.
//! 2. Value change events fire only when the new value differs from the old
//!    one under `PartialEq`.
//! 3. A value the field writes to its source is not applied again when the
//!    source echoes it back.
//! 4. Validators never run implicitly; only `validate()` and `is_valid()`
//!    run them.
//!
//! # Failure Modes
//!
//! - Unconvertible widget input: the internal value is left unchanged and
//!   the next `validate()` reports the conversion error.
//! - Write-back refused by the source: logged at `warn`; the field keeps the
//!   new value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use fbind_i18n::defaults::keys;
use fbind_runtime::reactive::{Signal, Subscription};

use crate::binding::{BindingState, ValueBinding};
use crate::component::{Component, ComponentId};
use crate::context::FieldContext;
use crate::converter::Converter;
use crate::editable::{self, CascadeTarget, EditableParent, EditableState};
use crate::error::{BindingStateError, ComponentError, ValidationError, ValidationErrors};
use crate::presentation::Presentation;
use crate::source::{ValueChange, ValueSource};
use crate::validator::{Validator, ValidatorChain};
use crate::value::{ModelValue, is_empty};

/// A field whose widget shows text.
pub type TextField<V> = Field<V, String>;

/// Published after the field's value changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChangeEvent<V> {
    pub prev: Option<V>,
    pub value: Option<V>,
    /// Set for `set_value_from_user` and widget edits.
    pub user_originated: bool,
}

/// Where a new internal value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    Programmatic,
    User,
    Widget,
    Source,
    Options,
}

impl Origin {
    fn is_user(self) -> bool {
        matches!(self, Self::User | Self::Widget)
    }

    fn writes_back(self) -> bool {
        matches!(self, Self::Programmatic | Self::User | Self::Widget)
    }
}

struct FieldState<V> {
    value: Option<V>,
    caption: Option<String>,
    required: bool,
    required_message: Option<String>,
    visible: bool,
    enabled: bool,
    validators: ValidatorChain<V>,
    validation_error: Option<ValidationError>,
}

pub(crate) struct FieldInner<V: ModelValue, P: 'static> {
    id: ComponentId,
    context: FieldContext,
    presentation: Rc<dyn Presentation<P>>,
    converter: Box<dyn Converter<V, P>>,
    state: RefCell<FieldState<V>>,
    binding: RefCell<ValueBinding<V>>,
    editable: EditableState,
    value_changed: Signal<ValueChangeEvent<V>>,
    widget_subscription: RefCell<Option<Subscription>>,
    pushing: Cell<bool>,
    source_filter: RefCell<Option<SourceFilter<V>>>,
}

/// Maps a value arriving from the source before the field takes it.
pub(crate) type SourceFilter<V> = Rc<dyn Fn(Option<V>) -> Option<V>>;

impl<V: ModelValue, P: 'static> FieldInner<V, P> {
    fn push_presentation(&self, value: Option<&V>) {
        let presentation = self.converter.to_presentation(value, &self.context);
        let previous = self.pushing.replace(true);
        self.presentation.set_value(presentation);
        self.pushing.set(previous);
    }

    fn apply_value(&self, value: Option<V>, origin: Origin) {
        if origin != Origin::Widget {
            self.push_presentation(value.as_ref());
        }
        let prev = {
            let mut state = self.state.borrow_mut();
            if origin != Origin::Options {
                state.validation_error = None;
            }
            if state.value == value {
                return;
            }
            std::mem::replace(&mut state.value, value.clone())
        };

        let settled = if origin.writes_back() {
            self.write_back(&value)
        } else {
            None
        };

        tracing::trace!(field = %self.id, ?origin, "value changed");
        self.value_changed.emit(&ValueChangeEvent {
            prev,
            value,
            user_originated: origin.is_user(),
        });

        if let Some(settled) = settled {
            tracing::debug!(field = %self.id, "source settled on a different value");
            let settled = self.filter_source_value(settled);
            self.apply_value(settled, Origin::Source);
        }
    }

    /// Write `value` to the active source. Returns the source's value when
    /// it ended up different from the one written, e.g. after a subscriber
    /// normalized it during the write.
    fn write_back(&self, value: &Option<V>) -> Option<Option<V>> {
        let writer = self.binding.borrow().writer().ok()?;
        match writer.write(value.clone()) {
            Ok(true) => {
                let current = writer.source_value();
                (current != *value).then_some(current)
            }
            Ok(false) => None,
            Err(err) => {
                tracing::warn!(field = %self.id, error = %err, "value source rejected write-back");
                None
            }
        }
    }

    fn on_widget_change(&self, presentation: &P) {
        if self.pushing.get() {
            return;
        }
        match self.converter.to_model(presentation, &self.context) {
            Ok(value) => self.apply_value(value, Origin::Widget),
            Err(err) => {
                tracing::debug!(field = %self.id, error = %err, "widget input not convertible");
            }
        }
    }

    fn filter_source_value(&self, value: Option<V>) -> Option<V> {
        let filter = self.source_filter.borrow().clone();
        match filter {
            Some(filter) => filter(value),
            None => value,
        }
    }

    fn on_source_change(&self, change: &ValueChange<V>) {
        let value = self.filter_source_value(change.new.clone());
        if self.state.borrow().value == value {
            tracing::trace!(field = %self.id, "source change equals field value");
            return;
        }
        self.apply_value(value, Origin::Source);
    }

    fn required_message(&self, state: &FieldState<V>) -> String {
        if let Some(message) = &state.required_message {
            return message.clone();
        }
        let key = self.converter.required_message_key();
        match &state.caption {
            Some(caption) if key == keys::REQUIRED => self
                .context
                .message(keys::REQUIRED_CAPTION, &[("caption", caption.as_str())]),
            _ => self.context.message(key, &[]),
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        let value = self
            .converter
            .to_model(&self.presentation.value(), &self.context)?;
        let validators = {
            let state = self.state.borrow();
            if state.required && is_empty(value.as_ref()) {
                return Err(ValidationError::RequiredValueMissing {
                    message: self.required_message(&state),
                });
            }
            state.validators.clone()
        };
        validators
            .validate(value.as_ref(), &self.context)
            .map_err(|message| ValidationError::ValidationFailed { message })
    }
}

impl<V: ModelValue, P: 'static> CascadeTarget for FieldInner<V, P> {
    fn editable_state(&self) -> &EditableState {
        &self.editable
    }

    fn on_effective_editable_changed(&self, editable: bool) {
        self.presentation.set_read_only(!editable);
    }
}

/// A data-aware field: presentation adapter, converter, validators and an
/// optional value binding.
///
/// Cloning yields another handle to the same field.
pub struct Field<V: ModelValue, P: 'static> {
    inner: Rc<FieldInner<V, P>>,
}

impl<V: ModelValue, P: 'static> Clone for Field<V, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: ModelValue, P: 'static> fmt::Debug for Field<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Field")
            .field("id", &self.inner.id)
            .field("caption", &state.caption)
            .field("value", &state.value)
            .field("required", &state.required)
            .field("editable", &self.inner.editable)
            .field("binding", &self.inner.binding.borrow().state())
            .finish_non_exhaustive()
    }
}

impl<V: ModelValue, P: 'static> Field<V, P> {
    /// Wrap `presentation`, converting with `converter`. The widget is reset
    /// to the empty presentation.
    pub fn new(
        presentation: Rc<dyn Presentation<P>>,
        converter: impl Converter<V, P> + 'static,
        context: FieldContext,
    ) -> Self {
        let inner = Rc::new(FieldInner {
            id: ComponentId::next(),
            context,
            presentation,
            converter: Box::new(converter),
            state: RefCell::new(FieldState {
                value: None,
                caption: None,
                required: false,
                required_message: None,
                visible: true,
                enabled: true,
                validators: ValidatorChain::new(),
                validation_error: None,
            }),
            binding: RefCell::new(ValueBinding::new()),
            editable: EditableState::new(),
            value_changed: Signal::new(),
            widget_subscription: RefCell::new(None),
            pushing: Cell::new(false),
            source_filter: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let sub = inner
            .presentation
            .subscribe_on_change(Box::new(move |presentation: &P| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_widget_change(presentation);
                }
            }));
        inner.widget_subscription.replace(Some(sub));
        inner.push_presentation(None);
        Self { inner }
    }

    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    #[must_use]
    pub fn context(&self) -> &FieldContext {
        &self.inner.context
    }

    /// The internal model value.
    #[must_use]
    pub fn value(&self) -> Option<V> {
        self.inner.state.borrow().value.clone()
    }

    /// Set the value programmatically. Does not run validators.
    pub fn set_value(&self, value: Option<V>) {
        self.inner.apply_value(value, Origin::Programmatic);
    }

    /// Set the value on behalf of the user; the change event is flagged
    /// `user_originated`.
    pub fn set_value_from_user(&self, value: Option<V>) {
        self.inner.apply_value(value, Origin::User);
    }

    /// What the widget currently shows.
    #[must_use]
    pub fn presentation_value(&self) -> P {
        self.inner.presentation.value()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_value_change(
        &self,
        callback: impl Fn(&ValueChangeEvent<V>) + 'static,
    ) -> Subscription {
        self.inner.value_changed.subscribe(callback)
    }

    #[must_use]
    pub fn caption(&self) -> Option<String> {
        self.inner.state.borrow().caption.clone()
    }

    pub fn set_caption(&self, caption: impl Into<String>) {
        self.inner.state.borrow_mut().caption = Some(caption.into());
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.inner.state.borrow().required
    }

    pub fn set_required(&self, required: bool) {
        self.inner.state.borrow_mut().required = required;
    }

    /// Message used instead of the type-specific default when a required
    /// value is missing.
    pub fn set_required_message(&self, message: impl Into<String>) {
        self.inner.state.borrow_mut().required_message = Some(message.into());
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.inner.state.borrow().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.inner.state.borrow_mut().visible = visible;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.state.borrow().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.state.borrow_mut().enabled = enabled;
    }

    pub fn add_validator(&self, validator: impl Validator<V> + 'static) {
        self.inner.state.borrow_mut().validators.push(validator);
    }

    pub fn clear_validators(&self) {
        self.inner.state.borrow_mut().validators.clear();
    }

    /// The error stored by the last `validate()`, cleared by `set_value`.
    #[must_use]
    pub fn validation_error(&self) -> Option<ValidationError> {
        self.inner.state.borrow().validation_error.clone()
    }

    /// Validate the widget's current content.
    ///
    /// Invisible, disabled and non-editable fields pass and have their error
    /// cleared. Otherwise the presentation is converted, the required check
    /// runs, then the validator chain. The outcome is stored as the field's
    /// validation error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let skip = {
            let state = self.inner.state.borrow();
            !state.visible || !state.enabled || !self.inner.editable.effective()
        };
        let result = if skip { Ok(()) } else { self.inner.check() };
        self.inner.state.borrow_mut().validation_error = result.clone().err();
        result
    }

    /// `validate()` as a boolean.
    ///
    /// Not pure: like `validate()`, it replaces the stored validation error.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The local editable flag.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.inner.editable.local()
    }

    /// Local flag AND parent cascade AND a writable source.
    #[must_use]
    pub fn is_editable_with_parent(&self) -> bool {
        self.inner.editable.effective()
    }

    pub fn set_editable(&self, editable: bool) {
        let change = self.inner.editable.set_local(editable);
        editable::propagate(&*self.inner, change);
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_editable_change(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.inner.editable.subscribe(callback)
    }

    /// Store `source` without subscribing to it.
    pub fn bind_value_source(
        &self,
        source: Rc<dyn ValueSource<V>>,
    ) -> Result<(), BindingStateError> {
        let read_only = source.is_read_only();
        self.inner.binding.borrow_mut().bind(source)?;
        tracing::debug!(field = %self.inner.id, read_only, "value source bound");
        let change = self.inner.editable.set_source_read_only(read_only);
        editable::propagate(&*self.inner, change);
        Ok(())
    }

    /// Show the bound source's value and subscribe to its changes.
    pub fn activate(&self) -> Result<(), BindingStateError> {
        let weak = Rc::downgrade(&self.inner);
        let initial = self
            .inner
            .binding
            .borrow_mut()
            .activate(move |change: &ValueChange<V>| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_source_change(change);
                }
            })?;
        tracing::debug!(field = %self.inner.id, "value binding activated");
        let initial = self.inner.filter_source_value(initial);
        self.inner.apply_value(initial, Origin::Source);
        Ok(())
    }

    /// Release the source. Safe to call when nothing is bound.
    pub fn unbind(&self) {
        let was = self.inner.binding.borrow().state();
        self.inner.binding.borrow_mut().unbind();
        if was != BindingState::Unbound {
            tracing::debug!(field = %self.inner.id, "value source unbound");
        }
        let change = self.inner.editable.set_source_read_only(false);
        editable::propagate(&*self.inner, change);
    }

    /// Replace the value source: unbind the current one, then bind and
    /// activate `source` if given.
    pub fn set_value_source(
        &self,
        source: Option<Rc<dyn ValueSource<V>>>,
    ) -> Result<(), BindingStateError> {
        self.unbind();
        if let Some(source) = source {
            self.bind_value_source(source)?;
            self.activate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn value_source(&self) -> Option<Rc<dyn ValueSource<V>>> {
        self.inner.binding.borrow().source()
    }

    #[must_use]
    pub fn binding_state(&self) -> BindingState {
        self.inner.binding.borrow().state()
    }

    /// The value the active source holds, for selection recomputation.
    pub(crate) fn active_source_value(&self) -> Option<Option<V>> {
        let binding = self.inner.binding.borrow();
        if binding.state() != BindingState::Active {
            return None;
        }
        binding.source().map(|source| source.value())
    }

    pub(crate) fn apply(&self, value: Option<V>, origin: Origin) {
        self.inner.apply_value(value, origin);
    }

    /// Install the mapping applied to every value taken from the source.
    pub(crate) fn set_source_filter(&self, filter: SourceFilter<V>) {
        self.inner.source_filter.replace(Some(filter));
    }
}

impl<V: ModelValue, P: 'static> Component for Field<V, P> {
    fn id(&self) -> ComponentId {
        self.inner.id
    }

    fn caption(&self) -> Option<String> {
        Field::caption(self)
    }

    fn is_visible(&self) -> bool {
        Field::is_visible(self)
    }

    fn collect_errors(&self, errors: &mut ValidationErrors) {
        if let Err(error) = self.validate() {
            errors.push(ComponentError {
                id: self.inner.id,
                caption: Field::caption(self),
                error,
            });
        }
    }

    fn attach_to(&self, parent: &dyn EditableParent) {
        editable::attach(&self.inner, parent);
    }

    fn detach(&self) {
        editable::detach(&*self.inner);
    }

    fn is_editable_with_parent(&self) -> bool {
        Field::is_editable_with_parent(self)
    }
}
