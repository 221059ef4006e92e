//! Explicit per-field environment: locale, messages and formats.
//!
//! Converters and validators receive a [`FieldContext`] instead of looking up
//! a "current session". Cloning is cheap; clones share the locale context and
//! the message source, so a locale switch is seen by every field built from
//! the same context.

use std::fmt;
use std::rc::Rc;

use fbind_i18n::catalog::{Locale, MessageCatalog, MessageSource, interpolate};
use fbind_i18n::format::FormatSpec;
use fbind_runtime::LocaleContext;

/// Locale, message source and format conventions for a field.
#[derive(Clone)]
pub struct FieldContext {
    locale: LocaleContext,
    messages: Rc<dyn MessageSource>,
    format: Option<FormatSpec>,
}

impl Default for FieldContext {
    fn default() -> Self {
        Self::new(LocaleContext::default(), Rc::new(MessageCatalog::with_defaults()))
    }
}

impl fmt::Debug for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContext")
            .field("locale", &self.locale.current_locale())
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl FieldContext {
    #[must_use]
    pub fn new(locale: LocaleContext, messages: Rc<dyn MessageSource>) -> Self {
        Self {
            locale,
            messages,
            format: None,
        }
    }

    /// Default messages in a fixed locale.
    #[must_use]
    pub fn for_locale(locale: impl Into<Locale>) -> Self {
        Self::new(
            LocaleContext::new(locale),
            Rc::new(MessageCatalog::with_defaults()),
        )
    }

    /// Pin the format conventions instead of deriving them from the locale.
    #[must_use]
    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = Some(format);
        self
    }

    /// Build a context from a catalog configuration.
    #[cfg(feature = "config")]
    pub fn from_config(
        config: &fbind_i18n::CatalogConfig,
        locale: LocaleContext,
    ) -> Result<Self, fbind_i18n::I18nError> {
        let catalog = config.to_catalog()?;
        let format = config.format_for(&locale.current_locale());
        Ok(Self::new(locale, Rc::new(catalog)).with_format(format))
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale.current_locale()
    }

    #[must_use]
    pub fn locale_context(&self) -> &LocaleContext {
        &self.locale
    }

    #[must_use]
    pub fn format(&self) -> FormatSpec {
        self.format
            .clone()
            .unwrap_or_else(|| self.locale.format_spec())
    }

    /// Resolve and interpolate `key`. Unknown keys resolve to the key itself.
    #[must_use]
    pub fn message(&self, key: &str, args: &[(&str, &str)]) -> String {
        match self.messages.message(&self.locale(), key) {
            Some(template) => interpolate(&template, args),
            None => {
                tracing::trace!(key, "no message bundle provides key");
                key.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbind_i18n::defaults::keys;

    #[test]
    fn default_context_is_english() {
        let cx = FieldContext::default();
        assert_eq!(cx.locale(), "en");
        assert_eq!(cx.message(keys::REQUIRED, &[]), "Value is required");
    }

    #[test]
    fn messages_follow_locale_switch() {
        let cx = FieldContext::for_locale("en");
        let shared = cx.clone();
        cx.locale_context().set_locale("de");
        assert_eq!(
            shared.message(keys::REQUIRED_CAPTION, &[("caption", "Name")]),
            "Name ist erforderlich"
        );
        assert_eq!(shared.format().decimal_separator, ',');
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let cx = FieldContext::default();
        assert_eq!(cx.message("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn pinned_format_wins() {
        let cx = FieldContext::for_locale("de").with_format(FormatSpec::default());
        assert_eq!(cx.format().decimal_separator, '.');
    }
}
