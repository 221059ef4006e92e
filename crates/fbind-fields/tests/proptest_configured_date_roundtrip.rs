//! Property-based round-trip tests for configured date patterns.
//!
//! For every date pattern a catalog configuration accepts:
//!
//! 1. `to_model(to_presentation(d)) == Some(d)` for every date `d`.
//! 2. A pattern the configuration rejects never reaches a field context.

#![cfg(feature = "config")]

use chrono::NaiveDate;
use fbind_fields::{Converter, DateDatatype, FieldContext};
use fbind_i18n::{CatalogConfig, I18nError};
use fbind_runtime::LocaleContext;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const ACCEPTED: &[&str] = &[
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d %B %Y",
    "%b %-d %Y",
    "%F",
];

const REJECTED: &[&str] = &["%d.%m.%y", "%D", "%m/%Y", "%H:%M", "%Q", "%d.%m."];

fn document(pattern: &str) -> String {
    format!("[formats.en]\ndate_pattern = {pattern:?}\n")
}

fn context(pattern: &str) -> FieldContext {
    let config = CatalogConfig::from_toml_str(&document(pattern))
        .unwrap_or_else(|e| panic!("{pattern:?} rejected: {e}"));
    FieldContext::from_config(&config, LocaleContext::new("en")).expect("valid catalog")
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("day 1..=28 exists in every month"))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Accepted patterns round-trip every date
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn configured_pattern_roundtrip(
        date in date_strategy(),
        pattern in prop::sample::select(ACCEPTED),
    ) {
        let cx = context(pattern);
        let text = DateDatatype.to_presentation(Some(&date), &cx);
        prop_assert_eq!(DateDatatype.to_model(&text, &cx), Ok(Some(date)), "{}", text);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Lossy or invalid patterns are refused at load
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lossy_pattern_is_rejected(pattern in prop::sample::select(REJECTED)) {
        let rejected = matches!(
            CatalogConfig::from_toml_str(&document(pattern)),
            Err(I18nError::DatePattern { .. })
        );
        prop_assert!(rejected, "{} accepted", pattern);
    }
}
