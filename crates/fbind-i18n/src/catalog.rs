//! Message catalog with locale fallback and interpolation.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: every lookup tries the requested locale,
//!    then its language tag (`de-AT` → `de`), then walks the chain exactly
//!    once, returning `None` if no locale provides the key.
//!
//! 2. **Interpolation is single-pass**: [`interpolate`] replaces `{name}`
//!    tokens once; substituted values are never re-scanned.
//!
//! 3. **Later bundles win**: [`MessageCatalog::add_locale`] merges over an
//!    existing bundle for the same locale, so user messages override defaults.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in any locale | Returns `None` |
//! | Missing locale | Locale not loaded | Falls through chain |
//! | Bad interpolation arg | `{name}` but no `name` arg | Token left as-is |

use std::collections::HashMap;

/// Locale identifier (e.g., `"en"`, `"en-US"`, `"de"`).
pub type Locale = String;

/// Errors from i18n operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum I18nError {
    /// A locale string was malformed.
    #[error("invalid locale: {0}")]
    InvalidLocale(String),
    /// A catalog document could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
    /// A configured date pattern does not format and parse dates back
    /// unchanged.
    #[error("date pattern {pattern:?} for locale {locale:?} does not round-trip dates")]
    DatePattern { locale: String, pattern: String },
}

/// Pure `(locale, key) -> message` lookup consumed by fields and validators.
pub trait MessageSource {
    /// Resolve the raw (uninterpolated) message for `key`.
    fn message(&self, locale: &str, key: &str) -> Option<String>;
}

/// Messages for a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message, replacing any previous entry for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Look up a message by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the bundle is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    fn merge(&mut self, other: LocaleStrings) {
        self.strings.extend(other.strings);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocaleStrings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut strings = Self::new();
        for (k, v) in iter {
            strings.insert(k, v);
        }
        strings
    }
}

/// Central message catalog with locale fallback.
///
/// # Example
///
/// ```
/// use fbind_i18n::catalog::{LocaleStrings, MessageCatalog};
///
/// let mut catalog = MessageCatalog::new();
/// let mut en = LocaleStrings::new();
/// en.insert("validation.required.caption", "{caption} is required");
/// catalog.add_locale("en", en);
/// catalog.set_fallback_chain(vec!["en".into()]);
///
/// assert_eq!(
///     catalog.format("fr", "validation.required.caption", &[("caption", "Name")]),
///     Some("Name is required".into())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    locales: HashMap<Locale, LocaleStrings>,
    fallback_chain: Vec<Locale>,
}

impl MessageCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog preloaded with the built-in bundles and an `en`
    /// fallback.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for (locale, strings) in crate::defaults::bundles() {
            catalog.add_locale(locale, strings);
        }
        catalog.set_fallback_chain(vec!["en".into()]);
        catalog
    }

    /// Add messages for a locale, merging over any existing bundle.
    pub fn add_locale(&mut self, locale: impl Into<String>, strings: LocaleStrings) {
        self.locales.entry(locale.into()).or_default().merge(strings);
    }

    /// Set the fallback chain (tried in order when a key is missing).
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain;
    }

    /// The configured fallback chain.
    #[must_use]
    pub fn fallback_chain(&self) -> &[Locale] {
        &self.fallback_chain
    }

    /// Look up a message by key.
    ///
    /// Tries `locale`, then its bare language tag, then the fallback chain.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        let language = locale.split('-').next().unwrap_or(locale);
        let direct = std::iter::once(locale).chain((language != locale).then_some(language));
        let chain = self
            .fallback_chain
            .iter()
            .map(String::as_str)
            .filter(|fallback| *fallback != locale && *fallback != language);

        direct
            .chain(chain)
            .find_map(|candidate| self.locales.get(candidate).and_then(|ls| ls.get(key)))
    }

    /// Look up a message and perform `{name}` interpolation.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key)
            .map(|template| interpolate(template, args))
    }

    /// All registered locale tags.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }
}

impl MessageSource for MessageCatalog {
    fn message(&self, locale: &str, key: &str) -> Option<String> {
        self.get(locale, key).map(str::to_owned)
    }
}

/// Single-pass `{name}` interpolation. Unmatched tokens are left as-is.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }

        let mut token = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            token.push(c);
        }

        match args.iter().find(|&&(name, _)| name == token) {
            Some(&(_, value)) if found_close => result.push_str(value),
            _ => {
                result.push('{');
                result.push_str(&token);
                if found_close {
                    result.push('}');
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english_catalog() -> MessageCatalog {
        let mut catalog = MessageCatalog::new();
        let mut en = LocaleStrings::new();
        en.insert("required", "Value is required");
        en.insert("required.caption", "{caption} is required");
        en.insert("range", "Must be between {min} and {max}");
        catalog.add_locale("en", en);
        catalog.set_fallback_chain(vec!["en".into()]);
        catalog
    }

    #[test]
    fn simple_lookup() {
        let catalog = english_catalog();
        assert_eq!(catalog.get("en", "required"), Some("Value is required"));
    }

    #[test]
    fn missing_key_returns_none() {
        let catalog = english_catalog();
        assert_eq!(catalog.get("en", "nonexistent"), None);
    }

    #[test]
    fn missing_locale_falls_back() {
        let catalog = english_catalog();
        assert_eq!(catalog.get("fr", "required"), Some("Value is required"));
    }

    #[test]
    fn region_falls_back_to_language() {
        let mut catalog = english_catalog();
        let mut de = LocaleStrings::new();
        de.insert("required", "Wert erforderlich");
        catalog.add_locale("de", de);

        assert_eq!(catalog.get("de-AT", "required"), Some("Wert erforderlich"));
        assert_eq!(
            catalog.get("de-AT", "range"),
            Some("Must be between {min} and {max}")
        );
    }

    #[test]
    fn add_locale_merges_and_overrides() {
        let mut catalog = english_catalog();
        let mut patch = LocaleStrings::new();
        patch.insert("required", "Please fill in");
        catalog.add_locale("en", patch);

        assert_eq!(catalog.get("en", "required"), Some("Please fill in"));
        assert_eq!(
            catalog.get("en", "required.caption"),
            Some("{caption} is required")
        );
    }

    #[test]
    fn fallback_chain_order() {
        let mut catalog = MessageCatalog::new();
        catalog.add_locale("en", [("a", "A-en"), ("b", "B-en")].into_iter().collect());
        catalog.add_locale("es", [("a", "A-es")].into_iter().collect());
        catalog.set_fallback_chain(vec!["es".into(), "en".into()]);

        assert_eq!(catalog.get("pt", "a"), Some("A-es"));
        assert_eq!(catalog.get("pt", "b"), Some("B-en"));
    }

    #[test]
    fn interpolation_multiple_args() {
        let catalog = english_catalog();
        assert_eq!(
            catalog.format("en", "range", &[("min", "1"), ("max", "9")]),
            Some("Must be between 1 and 9".into())
        );
    }

    #[test]
    fn interpolation_edge_cases() {
        assert_eq!(interpolate("Hello {world", &[]), "Hello {world");
        assert_eq!(interpolate("Hello {}", &[]), "Hello {}");
        assert_eq!(interpolate("Hello World", &[]), "Hello World");
        assert_eq!(interpolate("{x} and {x}", &[("x", "A")]), "A and A");
        assert_eq!(interpolate("{x}", &[("x", "{x}")]), "{x}");
    }

    #[test]
    fn message_source_returns_owned() {
        let catalog = english_catalog();
        let source: &dyn MessageSource = &catalog;
        assert_eq!(
            source.message("en", "required").as_deref(),
            Some("Value is required")
        );
        assert_eq!(source.message("en", "nope"), None);
    }

    #[test]
    fn empty_catalog() {
        let catalog = MessageCatalog::new();
        assert_eq!(catalog.get("en", "anything"), None);
        assert!(catalog.locales().is_empty());
    }
}
