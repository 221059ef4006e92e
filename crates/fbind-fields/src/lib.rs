#![forbid(unsafe_code)]

//! Data-aware fields for fbind.
//!
//! A [`Field`] is composed from capabilities rather than inherited: a
//! [`Presentation`] adapter for the widget, a [`Converter`] between model and
//! presentation values, a [`ValidatorChain`], and optionally a
//! [`ValueBinding`] to a [`ValueSource`]. Selection fields add an
//! [`OptionsBinding`] to an [`Options`] provider. Editability cascades from
//! [`Container`]s to their descendants.
//!
//! All of this runs on a single UI thread; handles are `Rc`-based and not
//! `Send`.

pub mod binding;
pub mod component;
pub mod context;
pub mod converter;
pub mod datatype;
pub mod editable;
pub mod error;
pub mod field;
pub mod instance;
pub mod options;
pub mod options_binding;
pub mod presentation;
pub mod select;
pub mod source;
pub mod validator;
pub mod value;

pub use binding::{BindingState, BindingWriter, ValueBinding};
pub use component::{Component, ComponentId, Container};
pub use context::FieldContext;
pub use converter::{Converter, FnConverter, IdentityConverter};
pub use datatype::{
    BooleanDatatype, DateDatatype, DecimalDatatype, IntegerDatatype, LongDatatype, StringDatatype,
};
pub use editable::{EditableParent, EditableState};
pub use error::{
    BindingStateError, ComponentError, ConversionError, SourceError, ValidationError,
    ValidationErrors, WriteError,
};
pub use field::{Field, TextField, ValueChangeEvent};
pub use instance::{InstanceContainer, ItemChange, PropertyChange, PropertySource};
pub use options::{ListOptions, MapOptions, Options, OptionsChange};
pub use options_binding::OptionsBinding;
pub use presentation::{MemoryInput, MemorySelect, OptionsPresentation, Presentation};
pub use select::{MultiSelectField, OptionsField, SelectField};
pub use source::{SupplierSource, ValueChange, ValueHolder, ValueSource};
pub use validator::{
    FnValidator, NotBlank, PatternValidator, RangeValidator, SizeValidator, ValidationResult,
    Validator, ValidatorChain,
};
pub use value::{ById, Entity, HasLength, ModelValue};
