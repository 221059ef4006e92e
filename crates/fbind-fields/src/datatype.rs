//! Locale-aware text datatypes.
//!
//! Each datatype is a [`Converter`] from a model type to the `String` a text
//! input shows. Empty input maps to `None`; for every type except
//! [`StringDatatype`] surrounding whitespace is ignored, so blank input is
//! empty too. Formatting follows the [`FormatSpec`](fbind_i18n::FormatSpec)
//! of the field context at the time of the call.
//!
//! Output never contains grouping separators; input may. For well-formed
//! values `to_model(to_presentation(v)) == v`.

use std::fmt::Write as _;
use std::str::FromStr;

use chrono::NaiveDate;
use fbind_i18n::defaults::keys;

use crate::context::FieldContext;
use crate::converter::Converter;
use crate::error::ConversionError;

fn conversion_error(cx: &FieldContext, key: &str, text: &str, args: &[(&str, &str)]) -> ConversionError {
    let mut all = Vec::with_capacity(args.len() + 1);
    all.push(("value", text));
    all.extend_from_slice(args);
    ConversionError::new(cx.message(key, &all))
}

/// Strip grouping separators; `None` when the text is blank.
fn normalize_number(text: &str, cx: &FieldContext) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let format = cx.format();
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if Some(c) == format.grouping_separator && c != format.decimal_separator {
            continue;
        }
        if c == format.decimal_separator {
            out.push('.');
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn parse_integer<T: FromStr>(text: &str, cx: &FieldContext) -> Result<Option<T>, ConversionError> {
    let Some(normalized) = normalize_number(text, cx) else {
        return Ok(None);
    };
    normalized
        .parse()
        .map(Some)
        .map_err(|_| conversion_error(cx, keys::CONVERSION_INTEGER, text.trim(), &[]))
}

/// Plain text. Only the empty string is `None`; whitespace is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringDatatype;

impl Converter<String, String> for StringDatatype {
    fn to_presentation(&self, value: Option<&String>, _cx: &FieldContext) -> String {
        value.cloned().unwrap_or_default()
    }

    fn to_model(&self, presentation: &String, _cx: &FieldContext) -> Result<Option<String>, ConversionError> {
        if presentation.is_empty() {
            Ok(None)
        } else {
            Ok(Some(presentation.clone()))
        }
    }
}

/// `i32` in decimal notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerDatatype;

impl Converter<i32, String> for IntegerDatatype {
    fn to_presentation(&self, value: Option<&i32>, _cx: &FieldContext) -> String {
        value.map(ToString::to_string).unwrap_or_default()
    }

    fn to_model(&self, presentation: &String, cx: &FieldContext) -> Result<Option<i32>, ConversionError> {
        parse_integer(presentation, cx)
    }
}

/// `i64` in decimal notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongDatatype;

impl Converter<i64, String> for LongDatatype {
    fn to_presentation(&self, value: Option<&i64>, _cx: &FieldContext) -> String {
        value.map(ToString::to_string).unwrap_or_default()
    }

    fn to_model(&self, presentation: &String, cx: &FieldContext) -> Result<Option<i64>, ConversionError> {
        parse_integer(presentation, cx)
    }
}

/// Finite `f64` with the locale decimal separator.
///
/// Without `fraction_digits` the shortest representation that parses back to
/// the same value is shown. With it, output is rounded and the round trip is
/// only exact up to that precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalDatatype {
    fraction_digits: Option<usize>,
}

impl DecimalDatatype {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fraction_digits(digits: usize) -> Self {
        Self {
            fraction_digits: Some(digits),
        }
    }
}

impl Converter<f64, String> for DecimalDatatype {
    fn to_presentation(&self, value: Option<&f64>, cx: &FieldContext) -> String {
        let Some(value) = value else {
            return String::new();
        };
        let text = match self.fraction_digits {
            Some(digits) => format!("{value:.digits$}"),
            None => value.to_string(),
        };
        let separator = cx.format().decimal_separator;
        if separator == '.' {
            text
        } else {
            text.replace('.', separator.encode_utf8(&mut [0; 4]))
        }
    }

    fn to_model(&self, presentation: &String, cx: &FieldContext) -> Result<Option<f64>, ConversionError> {
        let Some(normalized) = normalize_number(presentation, cx) else {
            return Ok(None);
        };
        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(conversion_error(
                cx,
                keys::CONVERSION_DECIMAL,
                presentation.trim(),
                &[],
            )),
        }
    }
}

/// `bool` shown with the locale's yes/no words.
///
/// Input accepts the locale words and `true`/`false`, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanDatatype;

impl Converter<bool, String> for BooleanDatatype {
    fn to_presentation(&self, value: Option<&bool>, cx: &FieldContext) -> String {
        match value {
            None => String::new(),
            Some(true) => cx.format().true_word,
            Some(false) => cx.format().false_word,
        }
    }

    fn to_model(&self, presentation: &String, cx: &FieldContext) -> Result<Option<bool>, ConversionError> {
        let text = presentation.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let format = cx.format();
        if text.eq_ignore_ascii_case(&format.true_word) || text.eq_ignore_ascii_case("true") {
            Ok(Some(true))
        } else if text.eq_ignore_ascii_case(&format.false_word) || text.eq_ignore_ascii_case("false") {
            Ok(Some(false))
        } else {
            Err(conversion_error(cx, keys::CONVERSION_BOOLEAN, text, &[]))
        }
    }
}

/// Calendar date in the locale date pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateDatatype;

/// `%d.%m.%Y` → `dd.mm.yyyy`, for error messages.
fn readable_pattern(pattern: &str) -> String {
    pattern
        .replace("%d", "dd")
        .replace("%m", "mm")
        .replace("%Y", "yyyy")
        .replace("%y", "yy")
}

/// `None` when chrono cannot format a date with `pattern`.
fn format_date(date: &NaiveDate, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

impl Converter<NaiveDate, String> for DateDatatype {
    /// Falls back to ISO `yyyy-mm-dd` when the context's pattern is unusable.
    fn to_presentation(&self, value: Option<&NaiveDate>, cx: &FieldContext) -> String {
        let Some(date) = value else {
            return String::new();
        };
        let pattern = cx.format().date_pattern;
        format_date(date, &pattern).unwrap_or_else(|| {
            tracing::warn!(pattern = %pattern, "unusable date pattern, formatting as ISO date");
            date.to_string()
        })
    }

    fn to_model(&self, presentation: &String, cx: &FieldContext) -> Result<Option<NaiveDate>, ConversionError> {
        let text = presentation.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let pattern = cx.format().date_pattern;
        NaiveDate::parse_from_str(text, &pattern)
            .map(Some)
            .map_err(|_| {
                conversion_error(
                    cx,
                    keys::CONVERSION_DATE,
                    text,
                    &[("pattern", readable_pattern(&pattern).as_str())],
                )
            })
    }
}
