//! Built-in message bundles for validation and conversion failures.

use crate::catalog::LocaleStrings;

/// Message keys consumed by the binding core.
pub mod keys {
    pub const REQUIRED: &str = "validation.required";
    pub const REQUIRED_CAPTION: &str = "validation.required.caption";
    pub const REQUIRED_SELECTION: &str = "validation.required.selection";
    pub const CONVERSION_INTEGER: &str = "conversion.integer";
    pub const CONVERSION_DECIMAL: &str = "conversion.decimal";
    pub const CONVERSION_BOOLEAN: &str = "conversion.boolean";
    pub const CONVERSION_DATE: &str = "conversion.date";
    pub const NOT_BLANK: &str = "validation.not_blank";
    pub const SIZE: &str = "validation.size";
    pub const RANGE_MIN: &str = "validation.range.min";
    pub const RANGE_MAX: &str = "validation.range.max";
    pub const PATTERN: &str = "validation.pattern";
}

const EN: &[(&str, &str)] = &[
    (keys::REQUIRED, "Value is required"),
    (keys::REQUIRED_CAPTION, "{caption} is required"),
    (keys::REQUIRED_SELECTION, "Select a value"),
    (keys::CONVERSION_INTEGER, "'{value}' is not a whole number"),
    (keys::CONVERSION_DECIMAL, "'{value}' is not a number"),
    (keys::CONVERSION_BOOLEAN, "'{value}' is not a yes/no value"),
    (keys::CONVERSION_DATE, "'{value}' is not a date ({pattern})"),
    (keys::NOT_BLANK, "Must not be blank"),
    (keys::SIZE, "Length must be between {min} and {max}"),
    (keys::RANGE_MIN, "Must be at least {min}"),
    (keys::RANGE_MAX, "Must be at most {max}"),
    (keys::PATTERN, "Does not match the expected format"),
];

const DE: &[(&str, &str)] = &[
    (keys::REQUIRED, "Wert ist erforderlich"),
    (keys::REQUIRED_CAPTION, "{caption} ist erforderlich"),
    (keys::REQUIRED_SELECTION, "Bitte einen Wert auswählen"),
    (keys::CONVERSION_INTEGER, "'{value}' ist keine ganze Zahl"),
    (keys::CONVERSION_DECIMAL, "'{value}' ist keine Zahl"),
    (keys::CONVERSION_BOOLEAN, "'{value}' ist kein Ja/Nein-Wert"),
    (keys::CONVERSION_DATE, "'{value}' ist kein Datum ({pattern})"),
    (keys::NOT_BLANK, "Darf nicht leer sein"),
    (keys::SIZE, "Länge muss zwischen {min} und {max} liegen"),
    (keys::RANGE_MIN, "Muss mindestens {min} sein"),
    (keys::RANGE_MAX, "Darf höchstens {max} sein"),
    (keys::PATTERN, "Entspricht nicht dem erwarteten Format"),
];

/// Built-in `(locale, bundle)` pairs.
#[must_use]
pub fn bundles() -> Vec<(&'static str, LocaleStrings)> {
    vec![
        ("en", EN.iter().copied().collect()),
        ("de", DE.iter().copied().collect()),
    ]
}
