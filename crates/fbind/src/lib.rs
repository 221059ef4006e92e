#![forbid(unsafe_code)]

//! fbind public facade crate.
//!
//! Re-exports the message catalog, the reactive runtime and the field layer
//! under one name. Most applications only need [`prelude`].

pub use fbind_fields as fields;
pub use fbind_i18n as i18n;
pub use fbind_runtime as runtime;

pub mod prelude {
    pub use fbind_fields::{
        BindingState, BooleanDatatype, Component, Container, Converter, DateDatatype,
        DecimalDatatype, Field, FieldContext, InstanceContainer, IntegerDatatype, ListOptions,
        LongDatatype, MapOptions, MultiSelectField, NotBlank, Options, OptionsPresentation,
        PatternValidator, Presentation, RangeValidator, SelectField, SizeValidator,
        StringDatatype, TextField, ValidationError, ValidationResult, Validator, ValueHolder,
        ValueSource,
    };
    pub use fbind_i18n::{FormatSpec, MessageCatalog, MessageSource};
    pub use fbind_runtime::{LocaleContext, Subscription};

    pub use fbind_fields as fields;
    pub use fbind_i18n as i18n;
    pub use fbind_runtime as runtime;
}
