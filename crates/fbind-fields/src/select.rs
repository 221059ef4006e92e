//! Selection fields fed by an [`Options`] provider.
//!
//! An [`OptionsField`] is a [`Field`] whose presentation value is the
//! selection itself, plus an [`OptionsBinding`]. Whenever the item list
//! changes, including on activation, the widget receives the full list and
//! the selection is recomputed:
//!
//! - the wanted selection is the active value source's value, or the field's
//!   current value when no source is active;
//! - items not in the list are dropped from the selection without raising a
//!   validation error and without writing to the value source;
//! - dropped items are logged and passed to the `on_selection_dropped` hook.
//!
//! While options are active, a value arriving from the source is pruned the
//! same way against the items the widget offers, so the selection never
//! holds an item outside the list whichever side changed last. Before
//! options are activated, source values are taken as they are.
//!
//! Because the source keeps its value, a selection dropped by a partially
//! loaded list comes back once the list contains it again.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::binding::BindingState;
use crate::component::{Component, ComponentId};
use crate::context::FieldContext;
use crate::converter::IdentityConverter;
use crate::editable::EditableParent;
use crate::error::{BindingStateError, ValidationErrors};
use crate::field::{Field, Origin};
use crate::options::{Options, OptionsChange};
use crate::options_binding::OptionsBinding;
use crate::presentation::{OptionsPresentation, Presentation};
use crate::value::ModelValue;

type Prune<V, I> = fn(Option<V>, &[I]) -> (Option<V>, Vec<I>);

fn prune_single<I: PartialEq>(value: Option<I>, items: &[I]) -> (Option<I>, Vec<I>) {
    match value {
        Some(v) if !items.contains(&v) => (None, vec![v]),
        other => (other, Vec::new()),
    }
}

fn prune_multi<I: PartialEq>(value: Option<Vec<I>>, items: &[I]) -> (Option<Vec<I>>, Vec<I>) {
    let Some(selection) = value else {
        return (None, Vec::new());
    };
    let (kept, dropped): (Vec<I>, Vec<I>) = selection.into_iter().partition(|i| items.contains(i));
    if dropped.is_empty() || !kept.is_empty() {
        (Some(kept), dropped)
    } else {
        (None, dropped)
    }
}

struct SelectInner<V, I> {
    widget: Rc<dyn OptionsPresentation<I>>,
    binding: RefCell<OptionsBinding<I>>,
    prune: Prune<V, I>,
    on_dropped: RefCell<Option<Rc<dyn Fn(&[I])>>>,
}

/// A selection field bound to an options provider.
///
/// Derefs to the underlying [`Field`] for value, validation, editable and
/// value source operations.
pub struct OptionsField<V: ModelValue, I: 'static> {
    field: Field<V, Option<V>>,
    inner: Rc<SelectInner<V, I>>,
}

/// Single selection; the model value is the selected item.
pub type SelectField<I> = OptionsField<I, I>;

/// Multiple selection; the model value is the selected items.
pub type MultiSelectField<I> = OptionsField<Vec<I>, I>;

impl<V: ModelValue, I: 'static> Clone for OptionsField<V, I> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: ModelValue, I: 'static> fmt::Debug for OptionsField<V, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsField")
            .field("field", &self.field)
            .field("options", &self.inner.binding.borrow().state())
            .finish()
    }
}

impl<V: ModelValue, I: 'static> Deref for OptionsField<V, I> {
    type Target = Field<V, Option<V>>;

    fn deref(&self) -> &Self::Target {
        &self.field
    }
}

impl<I: ModelValue> OptionsField<I, I> {
    /// Single-selection field over `widget`.
    pub fn single<W>(widget: Rc<W>, context: FieldContext) -> Self
    where
        W: Presentation<Option<I>> + OptionsPresentation<I> + 'static,
    {
        let presentation: Rc<dyn Presentation<Option<I>>> = widget.clone();
        Self::build(presentation, widget, context, prune_single)
    }
}

impl<I: ModelValue> OptionsField<Vec<I>, I> {
    /// Multi-selection field over `widget`.
    pub fn multi<W>(widget: Rc<W>, context: FieldContext) -> Self
    where
        W: Presentation<Option<Vec<I>>> + OptionsPresentation<I> + 'static,
    {
        let presentation: Rc<dyn Presentation<Option<Vec<I>>>> = widget.clone();
        Self::build(presentation, widget, context, prune_multi)
    }
}

impl<V: ModelValue, I: Clone + 'static> OptionsField<V, I> {
    fn build(
        presentation: Rc<dyn Presentation<Option<V>>>,
        widget: Rc<dyn OptionsPresentation<I>>,
        context: FieldContext,
        prune: Prune<V, I>,
    ) -> Self {
        let field = Field::new(presentation, IdentityConverter::for_selection(), context);
        let inner = Rc::new(SelectInner {
            widget,
            binding: RefCell::new(OptionsBinding::new()),
            prune,
            on_dropped: RefCell::new(None),
        });

        let id = field.id();
        let weak: Weak<SelectInner<V, I>> = Rc::downgrade(&inner);
        field.set_source_filter(Rc::new(move |value: Option<V>| {
            let Some(inner) = weak.upgrade() else {
                return value;
            };
            if inner.binding.borrow().state() != BindingState::Active {
                return value;
            }
            let (kept, dropped) = (inner.prune)(value, &inner.widget.items());
            report_dropped(id, &inner, &dropped);
            kept
        }));

        Self { field, inner }
    }

    /// The underlying field.
    #[must_use]
    pub fn field(&self) -> &Field<V, Option<V>> {
        &self.field
    }

    /// Items the widget currently offers.
    #[must_use]
    pub fn items(&self) -> Vec<I> {
        self.inner.widget.items()
    }

    /// Replace the options provider: unbind the current one, then bind and
    /// activate `options` if given.
    pub fn set_options(&self, options: Option<Rc<dyn Options<I>>>) -> Result<(), BindingStateError> {
        self.unbind_options();
        if let Some(options) = options {
            self.bind_options(options)?;
            self.activate_options()?;
        }
        Ok(())
    }

    /// Store `options` without subscribing.
    pub fn bind_options(&self, options: Rc<dyn Options<I>>) -> Result<(), BindingStateError> {
        self.inner.binding.borrow_mut().bind(options)?;
        tracing::debug!(field = %self.field.id(), "options bound");
        Ok(())
    }

    /// Populate the widget from the bound provider and follow its changes.
    pub fn activate_options(&self) -> Result<(), BindingStateError> {
        let field = self.field.clone();
        let inner: Weak<SelectInner<V, I>> = Rc::downgrade(&self.inner);
        let items = self
            .inner
            .binding
            .borrow_mut()
            .activate(move |change: &OptionsChange<I>, items: Vec<I>| {
                if let Some(inner) = inner.upgrade() {
                    tracing::trace!(
                        field = %field.id(),
                        replaced = matches!(change, OptionsChange::Replaced),
                        "options changed"
                    );
                    refresh(&field, &inner, items);
                }
            })?;
        tracing::debug!(field = %self.field.id(), items = items.len(), "options activated");
        refresh(&self.field, &self.inner, items);
        Ok(())
    }

    /// Release the options provider. Safe to call when nothing is bound.
    pub fn unbind_options(&self) {
        let mut binding = self.inner.binding.borrow_mut();
        if binding.state() != BindingState::Unbound {
            tracing::debug!(field = %self.field.id(), "options unbound");
        }
        binding.unbind();
    }

    #[must_use]
    pub fn options(&self) -> Option<Rc<dyn Options<I>>> {
        self.inner.binding.borrow().options()
    }

    #[must_use]
    pub fn options_binding_state(&self) -> BindingState {
        self.inner.binding.borrow().state()
    }

    /// Called with the items removed from the selection by an options change.
    pub fn set_on_selection_dropped(&self, hook: impl Fn(&[I]) + 'static) {
        self.inner.on_dropped.replace(Some(Rc::new(hook)));
    }
}

fn refresh<V: ModelValue, I: Clone + 'static>(
    field: &Field<V, Option<V>>,
    inner: &SelectInner<V, I>,
    items: Vec<I>,
) {
    let wanted = field.active_source_value().unwrap_or_else(|| field.value());
    let (kept, dropped) = (inner.prune)(wanted, &items);
    inner.widget.set_items(items);
    report_dropped(field.id(), inner, &dropped);
    field.apply(kept, Origin::Options);
}

fn report_dropped<V, I>(id: ComponentId, inner: &SelectInner<V, I>, dropped: &[I]) {
    if dropped.is_empty() {
        return;
    }
    tracing::warn!(field = %id, dropped = dropped.len(), "selection not among options, dropped");
    let hook = inner.on_dropped.borrow().clone();
    if let Some(hook) = hook {
        hook(dropped);
    }
}

impl<V: ModelValue, I: Clone + 'static> Component for OptionsField<V, I> {
    fn id(&self) -> ComponentId {
        self.field.id()
    }

    fn caption(&self) -> Option<String> {
        self.field.caption()
    }

    fn is_visible(&self) -> bool {
        self.field.is_visible()
    }

    fn collect_errors(&self, errors: &mut ValidationErrors) {
        self.field.collect_errors(errors);
    }

    fn attach_to(&self, parent: &dyn EditableParent) {
        self.field.attach_to(parent);
    }

    fn detach(&self) {
        Component::detach(&self.field);
    }

    fn is_editable_with_parent(&self) -> bool {
        self.field.is_editable_with_parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ListOptions;
    use crate::presentation::MemorySelect;
    use crate::source::{ValueHolder, ValueSource};
    use std::cell::Cell;
    use tracing_test::traced_test;

    fn single() -> (Rc<MemorySelect<Option<i32>, i32>>, SelectField<i32>) {
        let widget = Rc::new(MemorySelect::new());
        let field = SelectField::single(Rc::clone(&widget), FieldContext::default());
        (widget, field)
    }

    fn list(items: &[i32]) -> Rc<dyn Options<i32>> {
        Rc::new(ListOptions::new(items.iter().copied()))
    }

    #[test]
    fn activation_populates_widget_in_provider_order() {
        let (widget, field) = single();
        field.set_options(Some(list(&[3, 1, 2]))).unwrap();
        assert_eq!(widget.items(), vec![3, 1, 2]);
        assert_eq!(field.options_binding_state(), BindingState::Active);
    }

    #[test]
    fn rebinding_drops_missing_selection_silently() {
        let (widget, field) = single();
        field.set_options(Some(list(&[1, 2, 3]))).unwrap();
        field.set_value(Some(2));

        let dropped = Rc::new(RefCell::new(Vec::new()));
        let d = Rc::clone(&dropped);
        field.set_on_selection_dropped(move |items| d.borrow_mut().extend_from_slice(items));

        field.set_options(Some(list(&[3, 4, 5]))).unwrap();
        assert_eq!(field.value(), None);
        assert_eq!(widget.value(), None);
        assert_eq!(field.validation_error(), None);
        assert_eq!(*dropped.borrow(), vec![2]);
    }

    #[test]
    #[traced_test]
    fn dropped_selection_is_logged() {
        let (_widget, field) = single();
        field.set_options(Some(list(&[1, 2]))).unwrap();
        field.set_value(Some(2));
        assert!(!logs_contain("selection not among options, dropped"));

        field.set_options(Some(list(&[1]))).unwrap();
        assert!(logs_contain("selection not among options, dropped"));
    }

    #[test]
    fn kept_selection_survives_options_change() {
        let (_widget, field) = single();
        let options = ListOptions::new([1, 2]);
        field
            .set_options(Some(Rc::new(options.clone()) as Rc<dyn Options<i32>>))
            .unwrap();
        field.set_value(Some(1));
        options.add(3);
        assert_eq!(field.value(), Some(1));
        options.remove(&1);
        assert_eq!(field.value(), None);
    }

    #[test]
    fn source_value_returns_when_options_reload() {
        let (_widget, field) = single();
        let holder = ValueHolder::new(Some(2));
        field.set_value_source(Some(Rc::new(holder.clone()))).unwrap();
        let options = ListOptions::new([1]);
        field
            .set_options(Some(Rc::new(options.clone()) as Rc<dyn Options<i32>>))
            .unwrap();
        assert_eq!(field.value(), None);
        assert_eq!(holder.value(), Some(2));

        options.set_items([1, 2]);
        assert_eq!(field.value(), Some(2));
    }

    #[test]
    fn source_value_outside_options_is_pruned() {
        let (widget, field) = single();
        let holder = ValueHolder::new(Some(1));
        field.set_options(Some(list(&[1, 2]))).unwrap();
        field.set_value_source(Some(Rc::new(holder.clone()))).unwrap();
        assert_eq!(field.value(), Some(1));

        let dropped = Rc::new(RefCell::new(Vec::new()));
        let d = Rc::clone(&dropped);
        field.set_on_selection_dropped(move |items| d.borrow_mut().extend_from_slice(items));

        holder.set_value(Some(7)).unwrap();
        assert_eq!(field.value(), None);
        assert_eq!(widget.value(), None);
        assert_eq!(holder.value(), Some(7));
        assert_eq!(*dropped.borrow(), vec![7]);

        holder.set_value(Some(2)).unwrap();
        assert_eq!(field.value(), Some(2));
        assert_eq!(widget.value(), Some(2));
    }

    #[test]
    fn source_value_taken_as_is_before_options_activate() {
        let (_widget, field) = single();
        let holder = ValueHolder::new(Some(7));
        field.set_value_source(Some(Rc::new(holder.clone()))).unwrap();
        assert_eq!(field.value(), Some(7));
    }

    #[test]
    fn multi_select_prunes_source_value() {
        let widget = Rc::new(MemorySelect::<Option<Vec<i32>>, i32>::new());
        let field = MultiSelectField::multi(Rc::clone(&widget), FieldContext::default());
        field.set_options(Some(list(&[1, 2, 3]))).unwrap();
        let holder = ValueHolder::new(Some(vec![1, 9, 3]));
        field.set_value_source(Some(Rc::new(holder.clone()))).unwrap();
        assert_eq!(field.value(), Some(vec![1, 3]));
        assert_eq!(holder.value(), Some(vec![1, 9, 3]));
    }

    #[test]
    fn options_change_does_not_clear_validation_error() {
        let (_widget, field) = single();
        field.set_required(true);
        let options = ListOptions::new([1]);
        field
            .set_options(Some(Rc::new(options.clone()) as Rc<dyn Options<i32>>))
            .unwrap();
        assert_eq!(field.validate().unwrap_err().message(), "Select a value");
        options.add(2);
        assert!(field.validation_error().is_some());
    }

    #[test]
    fn unbinding_options_releases_subscription() {
        let (_widget, field) = single();
        let options = ListOptions::new([1]);
        field
            .set_options(Some(Rc::new(options.clone()) as Rc<dyn Options<i32>>))
            .unwrap();
        assert_eq!(options.subscriber_count(), 1);
        field.set_options(None).unwrap();
        field.unbind_options();
        assert_eq!(options.subscriber_count(), 0);
    }

    #[test]
    fn multi_select_keeps_present_items() {
        let widget = Rc::new(MemorySelect::<Option<Vec<i32>>, i32>::new());
        let field = MultiSelectField::multi(Rc::clone(&widget), FieldContext::default());
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        field.set_on_selection_dropped(move |_| c.set(c.get() + 1));

        field.set_options(Some(list(&[1, 2, 3]))).unwrap();
        field.set_value(Some(vec![1, 3]));
        field.set_options(Some(list(&[3, 4]))).unwrap();
        assert_eq!(field.value(), Some(vec![3]));
        field.set_options(Some(list(&[4]))).unwrap();
        assert_eq!(field.value(), None);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn user_selection_writes_back() {
        let (widget, field) = single();
        let holder = ValueHolder::<i32>::empty();
        field.set_value_source(Some(Rc::new(holder.clone()))).unwrap();
        field.set_options(Some(list(&[1, 2]))).unwrap();
        widget.select(Some(2));
        assert_eq!(holder.value(), Some(2));
    }
}
