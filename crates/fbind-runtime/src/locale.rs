#![forbid(unsafe_code)]

//! Locale context shared by the fields of one screen.
//!
//! A [`LocaleContext`] owns the current locale and exposes scoped overrides.
//! It is passed to fields explicitly; there is no process-wide locale, so
//! two screens (or two tests) can run with different locales side by side.

use std::cell::RefCell;
use std::env;
use std::rc::Rc;

pub use fbind_i18n::catalog::Locale;
use fbind_i18n::format::FormatSpec;

use crate::reactive::{Change, Observable, Subscription};

/// Locale holder with scoped overrides.
#[derive(Clone, Debug)]
pub struct LocaleContext {
    current: Observable<Locale>,
    overrides: Rc<RefCell<Vec<Locale>>>,
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::new("en")
    }
}

impl LocaleContext {
    /// Create a context with the provided locale.
    #[must_use]
    pub fn new(locale: impl Into<Locale>) -> Self {
        let locale = normalize_locale(locale.into());
        Self {
            current: Observable::new(locale),
            overrides: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Create a context initialized from system locale detection.
    #[must_use]
    pub fn system() -> Self {
        Self::new(detect_system_locale())
    }

    /// The active locale, honoring any scoped override.
    #[must_use]
    pub fn current_locale(&self) -> Locale {
        if let Some(locale) = self.overrides.borrow().last() {
            locale.clone()
        } else {
            self.current.get()
        }
    }

    /// The base locale without considering overrides.
    #[must_use]
    pub fn base_locale(&self) -> Locale {
        self.current.get()
    }

    /// Formatting conventions for the active locale.
    #[must_use]
    pub fn format_spec(&self) -> FormatSpec {
        FormatSpec::for_locale(&self.current_locale())
    }

    /// Set the base locale.
    pub fn set_locale(&self, locale: impl Into<Locale>) {
        let locale = normalize_locale(locale.into());
        if self.current.set(locale) {
            tracing::debug!(locale = %self.current.get(), "base locale changed");
        }
    }

    /// Subscribe to base locale changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&Change<Locale>) + 'static) -> Subscription {
        self.current.subscribe(callback)
    }

    /// Push a scoped override. Dropping the guard restores the prior locale.
    #[must_use = "dropping this guard clears the locale override"]
    pub fn push_override(&self, locale: impl Into<Locale>) -> LocaleOverride {
        let locale = normalize_locale(locale.into());
        self.overrides.borrow_mut().push(locale.clone());
        LocaleOverride {
            stack: Rc::clone(&self.overrides),
            locale,
        }
    }

    /// Version counter for the base locale.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.current.version()
    }
}

/// RAII guard for a scoped locale override.
#[must_use = "dropping this guard clears the locale override"]
pub struct LocaleOverride {
    stack: Rc<RefCell<Vec<Locale>>>,
    locale: Locale,
}

impl Drop for LocaleOverride {
    fn drop(&mut self) {
        let popped = self.stack.borrow_mut().pop();
        if let Some(popped) = popped {
            debug_assert_eq!(popped, self.locale);
        }
    }
}

/// Detect the system locale from environment variables.
///
/// Preference order: `LC_ALL`, then `LANG`. Falls back to `"en"`.
#[must_use]
pub fn detect_system_locale() -> Locale {
    let lc_all = env::var("LC_ALL").ok();
    let lang = env::var("LANG").ok();
    detect_system_locale_from(lc_all.as_deref(), lang.as_deref())
}

fn normalize_locale(locale: Locale) -> Locale {
    normalize_locale_raw(&locale).unwrap_or_else(|| "en".to_owned())
}

fn detect_system_locale_from(lc_all: Option<&str>, lang: Option<&str>) -> Locale {
    lc_all
        .and_then(normalize_locale_raw)
        .or_else(|| lang.and_then(normalize_locale_raw))
        .unwrap_or_else(|| "en".to_owned())
}

fn normalize_locale_raw(raw: &str) -> Option<Locale> {
    let raw = raw.trim();
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return Some("en".to_owned());
    }
    Some(raw.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn detect_system_locale_prefers_lc_all() {
        let locale = detect_system_locale_from(Some("de_DE.UTF-8"), Some("en_US.UTF-8"));
        assert_eq!(locale, "de-DE");
    }

    #[test]
    fn detect_system_locale_uses_lang_when_lc_all_missing() {
        let locale = detect_system_locale_from(None, Some("en_US.UTF-8"));
        assert_eq!(locale, "en-US");
    }

    #[test]
    fn detect_system_locale_defaults_to_en() {
        assert_eq!(detect_system_locale_from(None, None), "en");
        assert_eq!(detect_system_locale_from(Some("POSIX"), None), "en");
        assert_eq!(detect_system_locale_from(Some(" "), Some("")), "en");
    }

    #[test]
    fn switching_updates_version_and_notifies() {
        let ctx = LocaleContext::new("en");
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = ctx.subscribe(move |_| h.set(h.get() + 1));

        let v0 = ctx.version();
        ctx.set_locale("en");
        assert_eq!(ctx.version(), v0);
        ctx.set_locale("de_DE");
        assert!(ctx.version() > v0);
        assert_eq!(ctx.current_locale(), "de-DE");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn format_spec_follows_active_locale() {
        let ctx = LocaleContext::new("en");
        assert_eq!(ctx.format_spec().decimal_separator, '.');
        let _guard = ctx.push_override("de");
        assert_eq!(ctx.format_spec().decimal_separator, ',');
    }

    #[test]
    fn override_is_scoped_and_lifo() {
        let ctx = LocaleContext::new("en");
        let outer = ctx.push_override("fr");
        {
            let _inner = ctx.push_override("es");
            assert_eq!(ctx.current_locale(), "es");
        }
        assert_eq!(ctx.current_locale(), "fr");
        drop(outer);
        assert_eq!(ctx.current_locale(), "en");
        assert_eq!(ctx.base_locale(), "en");
    }
}
