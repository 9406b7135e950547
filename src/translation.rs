//! Translation capability consumed by the localized resolver.
//!
//! The crate only needs `translate(locale, key, args) -> string`. The locale
//! travels with each request ([`RequestContext::locale`]), so one translator
//! serves concurrent requests in different locales.
//!
//! [`InMemoryTranslator`] is a complete table-backed implementation suitable
//! for services with bundled message tables and for tests.
//!
//! [`RequestContext::locale`]: crate::RequestContext::locale

use std::collections::HashMap;

use serde::Deserialize;

use crate::{TranslateError, definitions, template};

/// Locale-sensitive key → text lookup.
pub trait Translator: Send + Sync {
    /// Render `key` in `locale` with positional `args`.
    ///
    /// `None` asks for the translator's default locale. With no arguments
    /// the raw template is returned, placeholders intact.
    fn translate(&self, locale: Option<&str>, key: &str, args: &[&str]) -> Result<String, TranslateError>;
}

/// Configuration for [`InMemoryTranslator`].
///
/// ```rust
/// # use result_manager::TranslatorOptions;
/// let options: TranslatorOptions = serde_json::from_str(
///     r#"{ "defaultLocale": "en", "supportedLocales": ["en", "fr"] }"#,
/// ).unwrap();
/// assert!(!options.use_key_as_default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslatorOptions {
    /// Locale used when none is requested or the requested one lacks a key.
    pub default_locale: String,
    /// Locales that may be requested. Empty means any locale with a table.
    pub supported_locales: Vec<String>,
    /// Return the key itself instead of failing when no template exists.
    pub use_key_as_default: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
            supported_locales: Vec::new(),
            use_key_as_default: false,
        }
    }
}

/// Immutable table-backed translator.
#[derive(Debug, Clone)]
pub struct InMemoryTranslator {
    options: TranslatorOptions,
    tables: HashMap<String, HashMap<String, String>>,
}

impl InMemoryTranslator {
    /// Empty translator.
    pub fn new(options: TranslatorOptions) -> Self {
        Self {
            options,
            tables: HashMap::new(),
        }
    }

    /// Translator whose default locale holds the built-in catalog templates.
    pub fn with_builtin_templates(options: TranslatorOptions) -> Self {
        let locale = options.default_locale.clone();
        let table = definitions::builtin_entries()
            .map(|entry| (entry.translation_key().to_owned(), entry.template().to_owned()));
        Self::new(options).with_table(locale, table)
    }

    /// Add (or extend) the table for `locale`.
    pub fn with_table<I, K, V>(mut self, locale: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tables
            .entry(locale.into())
            .or_default()
            .extend(entries.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Locale a request for `requested` is served in.
    ///
    /// `None` and unsupported locales get the default locale.
    pub fn negotiate<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(locale) if self.is_supported(locale) => locale,
            Some(locale) => {
                tracing::debug!(locale, default = %self.options.default_locale, "unsupported locale, using default");
                &self.options.default_locale
            }
            None => &self.options.default_locale,
        }
    }

    fn is_supported(&self, locale: &str) -> bool {
        if self.options.supported_locales.is_empty() {
            self.tables.contains_key(locale)
        } else {
            self.options.supported_locales.iter().any(|supported| supported == locale)
        }
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(&self.options.default_locale)
                    .and_then(|table| table.get(key))
            })
            .map(String::as_str)
    }
}

impl Translator for InMemoryTranslator {
    fn translate(&self, locale: Option<&str>, key: &str, args: &[&str]) -> Result<String, TranslateError> {
        let locale = self.negotiate(locale);
        match self.lookup(locale, key) {
            Some(text) => Ok(template::render(text, args)),
            None if self.options.use_key_as_default => Ok(key.to_owned()),
            None => Err(TranslateError::MissingKey {
                key: key.to_owned(),
                locale: locale.to_owned(),
            }),
        }
    }
}
