//! Property-based invariant tests for message resolution.
//!
//! 1. Text without `{` passes through interpolation unchanged.
//! 2. Substituted values are never re-scanned.
//! 3. Every built-in key resolves for any locale tag.

use fbind_i18n::defaults::keys;
use fbind_i18n::{MessageCatalog, interpolate};
use proptest::prelude::*;

const KEYS: &[&str] = &[
    keys::REQUIRED,
    keys::REQUIRED_CAPTION,
    keys::REQUIRED_SELECTION,
    keys::CONVERSION_INTEGER,
    keys::CONVERSION_DECIMAL,
    keys::CONVERSION_BOOLEAN,
    keys::CONVERSION_DATE,
    keys::NOT_BLANK,
    keys::SIZE,
    keys::RANGE_MIN,
    keys::RANGE_MAX,
    keys::PATTERN,
];

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Interpolation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn plain_text_is_unchanged(text in "[^{]*", value in ".*") {
        prop_assert_eq!(interpolate(&text, &[("value", value.as_str())]), text);
    }

    #[test]
    fn substitution_is_single_pass(prefix in "[^{]*", value in ".*") {
        let template = format!("{prefix}{{value}}");
        let out = interpolate(&template, &[("value", value.as_str()), ("x", "X")]);
        prop_assert_eq!(out, format!("{prefix}{value}"));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Fallback always resolves built-in keys
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn builtin_keys_resolve_for_any_locale(locale in "[a-z]{0,3}(-[A-Z]{2})?", key in prop::sample::select(KEYS)) {
        let catalog = MessageCatalog::with_defaults();
        prop_assert!(catalog.get(&locale, key).is_some());
    }
}
