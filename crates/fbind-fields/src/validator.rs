//! Validators and the ordered validator chain.
//!
//! A validator is a pure check over a model value. Empty values pass every
//! built-in validator except [`NotBlank`]; whether a value must be present is
//! the field's `required` flag, checked before the chain runs.

use std::fmt;
use std::rc::Rc;

use fbind_i18n::defaults::keys;
use regex::Regex;

use crate::context::FieldContext;
use crate::value::{HasLength, ModelValue, is_empty};

/// Outcome of one validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Ok,
    Failed(String),
}

impl ValidationResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// `Failed(message)` unless `ok`.
    #[must_use]
    pub fn check(ok: bool, message: impl FnOnce() -> String) -> Self {
        if ok { Self::Ok } else { Self::Failed(message()) }
    }
}

/// A check over a model value.
pub trait Validator<V> {
    fn validate(&self, value: Option<&V>, cx: &FieldContext) -> ValidationResult;
}

/// Validators evaluated in registration order; the first failure wins.
pub struct ValidatorChain<V> {
    validators: Vec<Rc<dyn Validator<V>>>,
}

impl<V> Default for ValidatorChain<V> {
    fn default() -> Self {
        Self {
            validators: Vec::new(),
        }
    }
}

impl<V> Clone for ValidatorChain<V> {
    fn clone(&self) -> Self {
        Self {
            validators: self.validators.clone(),
        }
    }
}

impl<V> fmt::Debug for ValidatorChain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorChain")
            .field("len", &self.validators.len())
            .finish()
    }
}

impl<V> ValidatorChain<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, validator: impl Validator<V> + 'static) {
        self.validators.push(Rc::new(validator));
    }

    pub fn clear(&mut self) {
        self.validators.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run the chain; the first failing validator's message is returned.
    pub fn validate(&self, value: Option<&V>, cx: &FieldContext) -> Result<(), String> {
        for validator in &self.validators {
            if let ValidationResult::Failed(message) = validator.validate(value, cx) {
                return Err(message);
            }
        }
        Ok(())
    }
}

/// Validator from a closure.
pub struct FnValidator<V> {
    check: Box<dyn Fn(Option<&V>, &FieldContext) -> ValidationResult>,
}

impl<V> FnValidator<V> {
    pub fn new(check: impl Fn(Option<&V>, &FieldContext) -> ValidationResult + 'static) -> Self {
        Self {
            check: Box::new(check),
        }
    }
}

impl<V> fmt::Debug for FnValidator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").finish_non_exhaustive()
    }
}

impl<V> Validator<V> for FnValidator<V> {
    fn validate(&self, value: Option<&V>, cx: &FieldContext) -> ValidationResult {
        (self.check)(value, cx)
    }
}

/// Rejects missing, empty and whitespace-only text.
#[derive(Debug, Clone, Default)]
pub struct NotBlank {
    message: Option<String>,
}

impl NotBlank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl Validator<String> for NotBlank {
    fn validate(&self, value: Option<&String>, cx: &FieldContext) -> ValidationResult {
        let blank = value.is_none_or(|v| v.trim().is_empty());
        ValidationResult::check(!blank, || {
            self.message
                .clone()
                .unwrap_or_else(|| cx.message(keys::NOT_BLANK, &[]))
        })
    }
}

/// Length within `min..=max`.
#[derive(Debug, Clone)]
pub struct SizeValidator {
    min: usize,
    max: usize,
    message: Option<String>,
}

impl SizeValidator {
    #[must_use]
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            message: None,
        }
    }

    #[must_use]
    pub fn max(max: usize) -> Self {
        Self::new(0, max)
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<V: HasLength + ModelValue> Validator<V> for SizeValidator {
    fn validate(&self, value: Option<&V>, cx: &FieldContext) -> ValidationResult {
        let Some(value) = value.filter(|v| !is_empty(Some(*v))) else {
            return ValidationResult::Ok;
        };
        let len = value.length();
        ValidationResult::check((self.min..=self.max).contains(&len), || {
            self.message.clone().unwrap_or_else(|| {
                cx.message(
                    keys::SIZE,
                    &[
                        ("min", self.min.to_string().as_str()),
                        ("max", self.max.to_string().as_str()),
                    ],
                )
            })
        })
    }
}

/// Value within optional inclusive bounds.
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
    message: Option<String>,
}

impl<T: PartialOrd + fmt::Display> RangeValidator<T> {
    #[must_use]
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self {
            min,
            max,
            message: None,
        }
    }

    #[must_use]
    pub fn at_least(min: T) -> Self {
        Self::new(Some(min), None)
    }

    #[must_use]
    pub fn at_most(max: T) -> Self {
        Self::new(None, Some(max))
    }

    #[must_use]
    pub fn between(min: T, max: T) -> Self {
        Self::new(Some(min), Some(max))
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn fail(&self, cx: &FieldContext, key: &str, name: &str, bound: &T) -> ValidationResult {
        ValidationResult::Failed(
            self.message
                .clone()
                .unwrap_or_else(|| cx.message(key, &[(name, bound.to_string().as_str())])),
        )
    }
}

impl<T: PartialOrd + fmt::Display> Validator<T> for RangeValidator<T> {
    fn validate(&self, value: Option<&T>, cx: &FieldContext) -> ValidationResult {
        let Some(value) = value else {
            return ValidationResult::Ok;
        };
        if let Some(min) = &self.min
            && value < min
        {
            return self.fail(cx, keys::RANGE_MIN, "min", min);
        }
        if let Some(max) = &self.max
            && value > max
        {
            return self.fail(cx, keys::RANGE_MAX, "max", max);
        }
        ValidationResult::Ok
    }
}

/// Text matching a regular expression in full.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    regex: Regex,
    message: Option<String>,
}

impl PatternValidator {
    /// Compile `pattern`, anchored at both ends.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&format!("^(?:{pattern})$"))?,
            message: None,
        })
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Validator<String> for PatternValidator {
    fn validate(&self, value: Option<&String>, cx: &FieldContext) -> ValidationResult {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return ValidationResult::Ok;
        };
        ValidationResult::check(self.regex.is_match(value), || {
            self.message
                .clone()
                .unwrap_or_else(|| cx.message(keys::PATTERN, &[]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx() -> FieldContext {
        FieldContext::default()
    }

    fn failing(message: &'static str) -> FnValidator<i32> {
        FnValidator::new(move |_: Option<&i32>, _: &FieldContext| {
            ValidationResult::Failed(message.to_owned())
        })
    }

    #[test]
    fn chain_short_circuits_on_first_failure() {
        let mut chain = ValidatorChain::new();
        chain.push(failing("A"));
        chain.push(failing("B"));
        assert_eq!(chain.validate(Some(&1), &cx()), Err("A".to_owned()));
        chain.clear();
        assert_eq!(chain.validate(Some(&1), &cx()), Ok(()));
    }

    #[test]
    fn not_blank_rejects_whitespace() {
        let cx = cx();
        assert!(!NotBlank::new().validate(Some(&"  ".to_string()), &cx).is_ok());
        assert!(!NotBlank::new().validate(None, &cx).is_ok());
        assert_eq!(
            NotBlank::with_message("name me").validate(None, &cx),
            ValidationResult::Failed("name me".into())
        );
        assert!(NotBlank::new().validate(Some(&"x".to_string()), &cx).is_ok());
    }

    #[test]
    fn size_counts_chars_and_skips_empty() {
        let cx = cx();
        let v = SizeValidator::new(2, 3);
        assert!(Validator::<String>::validate(&v, None, &cx).is_ok());
        assert!(v.validate(Some(&String::new()), &cx).is_ok());
        assert!(v.validate(Some(&"äö".to_string()), &cx).is_ok());
        assert_eq!(
            v.validate(Some(&"abcd".to_string()), &cx),
            ValidationResult::Failed("Length must be between 2 and 3".into())
        );
        assert!(!v.validate(Some(&vec![1]), &cx).is_ok());
    }

    #[test]
    fn range_reports_violated_bound() {
        let cx = FieldContext::for_locale("de");
        let v = RangeValidator::between(18, 99);
        assert_eq!(
            v.validate(Some(&17), &cx),
            ValidationResult::Failed("Muss mindestens 18 sein".into())
        );
        assert_eq!(
            v.validate(Some(&100), &cx),
            ValidationResult::Failed("Darf höchstens 99 sein".into())
        );
        assert!(v.validate(Some(&18), &cx).is_ok());
        assert!(v.validate(None, &cx).is_ok());
    }

    #[test]
    fn pattern_is_anchored() {
        let cx = cx();
        let v = PatternValidator::new("[A-Z]-\\d+").unwrap();
        assert!(v.validate(Some(&"A-12".to_string()), &cx).is_ok());
        assert!(!v.validate(Some(&"xA-12".to_string()), &cx).is_ok());
        assert!(v.validate(Some(&String::new()), &cx).is_ok());
        assert!(PatternValidator::new("(").is_err());
    }
}
