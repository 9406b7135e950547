//! The result manager: resolver injection and the shared failure pipeline.
//!
//! Every failure builder in [`builders`](crate::builders) runs the same
//! steps, in this order:
//!
//! 1. validate arguments (before any resolver call)
//! 2. classify the code (an unknown code is logged once, here)
//! 3. fetch the template in the request's locale, racing its cancellation
//!    token
//! 4. render the template with the positional arguments
//! 5. fill the context bag (`traceId`, `code`, `message`, then extras)
//! 6. wrap the [`ErrorValue`] in an [`Outcome::Failure`]

use std::sync::Arc;

use crate::resolver::with_cancellation;
use crate::{
    BuildError, ContextBuilder, DefaultResolver, ErrorCode, ErrorResolver, ErrorValue,
    LocalizedResolver, Outcome, RequestContext, Translator, keys, template,
};

/// Builds outcomes through an injected [`ErrorResolver`].
///
/// Cloning is cheap and clones share the resolver. The manager holds no
/// mutable state, so one instance can serve any number of concurrent
/// requests.
#[derive(Clone)]
pub struct ResultManager {
    resolver: Arc<dyn ErrorResolver>,
}

impl ResultManager {
    /// Manager over a custom resolver.
    pub fn new(resolver: Arc<dyn ErrorResolver>) -> Self {
        Self { resolver }
    }

    /// Manager whose templates come from `translator`.
    pub fn localized(translator: Arc<dyn Translator>) -> Self {
        Self::new(Arc::new(LocalizedResolver::new(translator)))
    }

    pub fn resolver(&self) -> &Arc<dyn ErrorResolver> {
        &self.resolver
    }

    /// Context builder pre-seeded with the leading fields.
    ///
    /// `message` is reserved here and filled once the description is
    /// rendered, so it keeps its third position.
    pub(crate) fn preamble(ctx: &RequestContext, code: ErrorCode) -> ContextBuilder {
        ContextBuilder::new()
            .text(keys::TRACE_ID, ctx.trace_id())
            .code(keys::CODE, code)
            .text(keys::MESSAGE, None)
    }

    /// Resolve, render and wrap a failure whose arguments are already valid.
    ///
    /// `template_code` selects the message template; it differs from `code`
    /// only when one category borrows another's wording.
    pub(crate) async fn fail(
        &self,
        ctx: &RequestContext,
        code: ErrorCode,
        template_code: ErrorCode,
        args: &[&str],
        context: ContextBuilder,
    ) -> Result<Outcome, BuildError> {
        if !self.resolver.is_known(code) {
            tracing::warn!(%code, "unknown error code, using unexpected-error entry");
        }
        let classification = self.resolver.classify(code);
        let cancellation = ctx.cancellation();
        let template = with_cancellation(
            template_code,
            cancellation,
            self.resolver.format(template_code, ctx.locale(), cancellation),
        )
        .await?;

        let description = template::render(&template, args);
        let context = context.text(keys::MESSAGE, Some(description.as_str())).build();
        let error = ErrorValue::new(code, classification, description, context)?;
        error.log_entry().emit();

        Ok(Outcome::Failure(error))
    }
}

impl Default for ResultManager {
    fn default() -> Self {
        Self::new(Arc::new(DefaultResolver::default()))
    }
}

impl std::fmt::Debug for ResultManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultManager").finish_non_exhaustive()
    }
}
