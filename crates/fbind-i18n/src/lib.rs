#![forbid(unsafe_code)]

//! Message resolution and locale conventions for fbind.
//!
//! The binding core never looks messages up from ambient state: each field
//! receives a [`MessageSource`] and a [`FormatSpec`] explicitly.

pub mod catalog;
#[cfg(feature = "config")]
pub mod config;
pub mod defaults;
pub mod format;

pub use catalog::{I18nError, Locale, LocaleStrings, MessageCatalog, MessageSource, interpolate};
#[cfg(feature = "config")]
pub use config::CatalogConfig;
pub use format::FormatSpec;
