//! Catalog configuration loaded from TOML or JSON documents.
//!
//! ```toml
//! fallback = ["en"]
//!
//! [messages.en]
//! "validation.required" = "Please fill in this field"
//!
//! [formats.de]
//! date_pattern = "%d.%m.%Y"
//! ```
//!
//! Configured messages merge over the built-in bundles; format overrides
//! patch the conventions derived by [`FormatSpec::for_locale`].
//!
//! A date pattern is accepted only if dates formatted with it parse back to
//! the same date, so it needs a day, a month and a four-digit year (`%Y`).
//! Two-digit years (`%y`) and time-only patterns are rejected.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::catalog::{I18nError, LocaleStrings, MessageCatalog};
use crate::format::FormatSpec;

/// Partial [`FormatSpec`]; unset fields keep the locale default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOverrides {
    pub decimal_separator: Option<char>,
    pub grouping_separator: Option<char>,
    pub date_pattern: Option<String>,
    pub true_word: Option<String>,
    pub false_word: Option<String>,
}

/// Deserialized catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Fallback chain; empty keeps `["en"]`.
    pub fallback: Vec<String>,
    /// `locale → key → message`.
    pub messages: HashMap<String, HashMap<String, String>>,
    /// `locale → format overrides`.
    pub formats: HashMap<String, FormatOverrides>,
}

impl CatalogConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, I18nError> {
        let config: Self = toml::from_str(input).map_err(|e| I18nError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, I18nError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| I18nError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every configured date pattern.
    pub fn validate(&self) -> Result<(), I18nError> {
        for (locale, overrides) in &self.formats {
            if let Some(pattern) = &overrides.date_pattern
                && !round_trips_dates(pattern)
            {
                return Err(I18nError::DatePattern {
                    locale: locale.clone(),
                    pattern: pattern.clone(),
                });
            }
        }
        Ok(())
    }

    /// Build a catalog: built-in defaults first, configured messages on top.
    pub fn to_catalog(&self) -> Result<MessageCatalog, I18nError> {
        self.validate()?;
        let mut catalog = MessageCatalog::with_defaults();
        for (locale, messages) in &self.messages {
            if locale.trim().is_empty() {
                return Err(I18nError::InvalidLocale(locale.clone()));
            }
            let strings: LocaleStrings = messages.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            catalog.add_locale(locale.as_str(), strings);
        }
        if !self.fallback.is_empty() {
            catalog.set_fallback_chain(self.fallback.clone());
        }
        Ok(catalog)
    }

    /// Conventions for `locale` with any configured overrides applied.
    ///
    /// Overrides for the bare language tag apply to regional locales too;
    /// an exact locale entry wins over the language entry.
    #[must_use]
    pub fn format_for(&self, locale: &str) -> FormatSpec {
        let mut spec = FormatSpec::for_locale(locale);
        let language = locale.split('-').next().unwrap_or(locale);
        let layers = [self.formats.get(language), self.formats.get(locale)];
        for overrides in layers.into_iter().flatten() {
            if let Some(sep) = overrides.decimal_separator {
                spec.decimal_separator = sep;
            }
            if overrides.grouping_separator.is_some() {
                spec.grouping_separator = overrides.grouping_separator;
            }
            if let Some(pattern) = &overrides.date_pattern {
                spec.date_pattern.clone_from(pattern);
            }
            if let Some(word) = &overrides.true_word {
                spec.true_word.clone_from(word);
            }
            if let Some(word) = &overrides.false_word {
                spec.false_word.clone_from(word);
            }
        }
        spec
    }
}

/// Dates far apart in century, month and day.
const SAMPLE_DATES: [(i32, u32, u32); 3] = [(1950, 3, 4), (2031, 11, 28), (1, 1, 1)];

fn round_trips_dates(pattern: &str) -> bool {
    SAMPLE_DATES.iter().all(|&(y, m, d)| {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            return false;
        };
        let mut text = String::new();
        write!(text, "{}", date.format(pattern)).is_ok()
            && NaiveDate::parse_from_str(&text, pattern) == Ok(date)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::keys;

    const TOML: &str = r#"
fallback = ["de", "en"]

[messages.en]
"validation.required" = "Please fill in this field"

[messages.de]
"custom.hint" = "Hinweis"

[formats.de]
date_pattern = "%d.%m.%Y"

[formats.de-CH]
grouping_separator = "'"
"#;

    #[test]
    fn toml_messages_override_defaults() {
        let config = CatalogConfig::from_toml_str(TOML).unwrap();
        let catalog = config.to_catalog().unwrap();

        assert_eq!(
            catalog.get("en", keys::REQUIRED),
            Some("Please fill in this field")
        );
        assert_eq!(
            catalog.get("en", keys::NOT_BLANK),
            Some("Must not be blank")
        );
        assert_eq!(catalog.get("fr", "custom.hint"), Some("Hinweis"));
        assert_eq!(catalog.fallback_chain(), ["de", "en"]);
    }

    #[test]
    fn format_overrides_layer_language_then_region() {
        let config = CatalogConfig::from_toml_str(TOML).unwrap();

        let de = config.format_for("de");
        assert_eq!(de.date_pattern, "%d.%m.%Y");
        assert_eq!(de.grouping_separator, Some('.'));

        let ch = config.format_for("de-CH");
        assert_eq!(ch.date_pattern, "%d.%m.%Y");
        assert_eq!(ch.grouping_separator, Some('\''));
        assert_eq!(ch.decimal_separator, ',');
    }

    #[test]
    fn json_documents_parse() {
        let config = CatalogConfig::from_json_str(
            r#"{ "messages": { "en": { "validation.pattern": "Bad format" } } }"#,
        )
        .unwrap();
        let catalog = config.to_catalog().unwrap();
        assert_eq!(catalog.get("en", keys::PATTERN), Some("Bad format"));
        assert_eq!(catalog.fallback_chain(), ["en"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = CatalogConfig::from_toml_str("colour = 1").unwrap_err();
        assert!(matches!(err, I18nError::Parse(_)));
    }

    #[test]
    fn date_patterns_must_round_trip() {
        for pattern in ["%d.%m.%y", "%Q", "%H:%M", "%m/%Y", "%D"] {
            let doc = format!("[formats.de]\ndate_pattern = {pattern:?}\n");
            assert_eq!(
                CatalogConfig::from_toml_str(&doc),
                Err(I18nError::DatePattern {
                    locale: "de".into(),
                    pattern: pattern.into(),
                }),
                "{pattern}"
            );
        }
        for pattern in ["%d.%m.%Y", "%Y/%m/%d", "%B %-d, %Y", "%F"] {
            let doc = format!("[formats.de]\ndate_pattern = {pattern:?}\n");
            assert!(CatalogConfig::from_toml_str(&doc).is_ok(), "{pattern}");
        }
    }

    #[test]
    fn hand_built_config_is_checked_before_use() {
        let mut config = CatalogConfig::default();
        config.formats.insert(
            "en".into(),
            FormatOverrides {
                date_pattern: Some("%y-%m-%d".into()),
                ..FormatOverrides::default()
            },
        );
        assert!(matches!(
            config.to_catalog(),
            Err(I18nError::DatePattern { .. })
        ));
    }

    #[test]
    fn blank_locale_is_rejected() {
        let config = CatalogConfig::from_json_str(r#"{ "messages": { " ": {} } }"#).unwrap();
        assert!(matches!(
            config.to_catalog(),
            Err(I18nError::InvalidLocale(_))
        ));
    }
}
