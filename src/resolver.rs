//! Error resolution: code → classification and message template.
//!
//! [`ErrorResolver`] has exactly two operations:
//!
//! - `classify` is synchronous, pure and total.
//! - `format` returns the uninterpolated template for the request's locale
//!   and may suspend, because a localized template can require an I/O-bound
//!   lookup. It is total over codes and honours the cancellation token it is
//!   given.
//!
//! Two resolvers ship with the crate and agree on classification because
//! both classify through a [`Catalog`]:
//!
//! - [`DefaultResolver`]: templates from the catalog itself.
//! - [`LocalizedResolver`]: templates from a [`Translator`], keyed by each
//!   entry's translation key, with the catalog template as fallback.
//!
//! Any other implementation can be injected into a
//! [`ResultManager`](crate::ResultManager) to add codes or change templates.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{Catalog, ErrorClassification, ErrorCode, ResolveError, TranslateError, Translator};

/// Maps error codes to classifications and message templates.
#[async_trait]
pub trait ErrorResolver: Send + Sync {
    /// Classification for `code`; unknown codes get the unexpected-error one.
    fn classify(&self, code: ErrorCode) -> ErrorClassification;

    /// Template for `code` in `locale`, not yet interpolated.
    ///
    /// `locale` is the request's preference; resolvers without localization
    /// ignore it.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Cancelled`] when `cancellation` fires first; any
    /// backend failure otherwise. Unknown codes are not an error.
    async fn format(
        &self,
        code: ErrorCode,
        locale: Option<&str>,
        cancellation: &CancellationToken,
    ) -> Result<Cow<'static, str>, ResolveError>;

    /// Whether `code` has its own entry rather than the unexpected-error
    /// fallback.
    fn is_known(&self, _code: ErrorCode) -> bool {
        true
    }
}

/// Run `lookup` unless `cancellation` fires first.
///
/// Cancellation wins ties, so an already-cancelled token never starts
/// reporting a template.
pub async fn with_cancellation<F, T>(
    code: ErrorCode,
    cancellation: &CancellationToken,
    lookup: F,
) -> Result<T, ResolveError>
where
    F: Future<Output = Result<T, ResolveError>>,
{
    tokio::select! {
        biased;
        () = cancellation.cancelled() => {
            tracing::debug!(%code, "template lookup cancelled");
            Err(ResolveError::Cancelled { code })
        }
        result = lookup => result,
    }
}

fn ensure_live(code: ErrorCode, cancellation: &CancellationToken) -> Result<(), ResolveError> {
    if cancellation.is_cancelled() {
        Err(ResolveError::Cancelled { code })
    } else {
        Ok(())
    }
}

// ============================================================================
// Default Resolver
// ============================================================================

/// In-memory resolver backed by a [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver {
    catalog: Catalog,
}

impl DefaultResolver {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl ErrorResolver for DefaultResolver {
    fn classify(&self, code: ErrorCode) -> ErrorClassification {
        self.catalog.classify(code)
    }

    async fn format(
        &self,
        code: ErrorCode,
        _locale: Option<&str>,
        cancellation: &CancellationToken,
    ) -> Result<Cow<'static, str>, ResolveError> {
        ensure_live(code, cancellation)?;
        Ok(Cow::Owned(self.catalog.resolve(code).template().to_owned()))
    }

    fn is_known(&self, code: ErrorCode) -> bool {
        self.catalog.contains(code)
    }
}

// ============================================================================
// Localized Resolver
// ============================================================================

/// Resolver that asks a [`Translator`] for each template.
///
/// A key the translator does not know resolves to the catalog entry's own
/// template, so custom codes and overrides work without translations.
#[derive(Clone)]
pub struct LocalizedResolver {
    catalog: Catalog,
    translator: Arc<dyn Translator>,
}

impl LocalizedResolver {
    /// Localized resolver over the built-in catalog.
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self::with_catalog(Catalog::builtin(), translator)
    }

    pub fn with_catalog(catalog: Catalog, translator: Arc<dyn Translator>) -> Self {
        Self { catalog, translator }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.translator
    }
}

impl std::fmt::Debug for LocalizedResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizedResolver")
            .field("catalog", &self.catalog)
            .field("translator", &"<dyn Translator>")
            .finish()
    }
}

#[async_trait]
impl ErrorResolver for LocalizedResolver {
    fn classify(&self, code: ErrorCode) -> ErrorClassification {
        self.catalog.classify(code)
    }

    async fn format(
        &self,
        code: ErrorCode,
        locale: Option<&str>,
        cancellation: &CancellationToken,
    ) -> Result<Cow<'static, str>, ResolveError> {
        ensure_live(code, cancellation)?;
        let entry = self.catalog.resolve(code);
        match self.translator.translate(locale, entry.translation_key(), &[]) {
            Ok(template) => Ok(Cow::Owned(template)),
            Err(TranslateError::MissingKey { key, locale }) => {
                tracing::debug!(%code, key = %key, locale = %locale, "no translation, using catalog template");
                Ok(Cow::Owned(entry.template().to_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn is_known(&self, code: ErrorCode) -> bool {
        self.catalog.contains(code)
    }
}
