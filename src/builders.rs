//! One named constructor per failure category.
//!
//! Builders are methods on [`ResultManager`]. Each takes the
//! [`RequestContext`] first, validates its arguments, then runs the shared
//! pipeline. The return value separates the two failure tiers:
//!
//! - `Ok(Outcome::Failure(_))`: the domain failure the caller asked for
//! - `Err(BuildError)`: a contract violation or a resolver problem
//!
//! Name and message arguments accept anything implementing [`TextArg`], so
//! an absent value (`None`) is reported as [`ArgumentError::Null`] and an
//! empty one as [`ArgumentError::Blank`], both before the resolver is
//! consulted.
//!
//! Every builder has a `*_typed` twin returning [`TypedOutcome<T>`]; it builds
//! the untyped outcome and converts it.
//!
//! ```rust
//! use result_manager::{RequestContext, ResultManager, codes::classifications};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), result_manager::BuildError> {
//! let manager = ResultManager::default();
//! let ctx = RequestContext::new("trace-1");
//!
//! let outcome = manager.resource_already_exists(&ctx, "User", "Email", "a@b.com").await?;
//! let error = outcome.error().unwrap();
//!
//! assert_eq!(error.classification(), &classifications::CONFLICT);
//! assert_eq!(error.description(), "User with Email 'a@b.com' already exists");
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    ArgumentError, BuildError, ErrorCode, Outcome, RequestContext, ResultManager, TypedOutcome,
    ValidationFailure, definitions, keys,
};

// ============================================================================
// Text Arguments
// ============================================================================

/// A string argument that may be absent.
pub trait TextArg {
    /// The text, or `None` when the argument is null.
    fn text(&self) -> Option<&str>;
}

impl TextArg for str {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl TextArg for String {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl TextArg for Cow<'_, str> {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: TextArg + ?Sized> TextArg for &T {
    fn text(&self) -> Option<&str> {
        (**self).text()
    }
}

impl<T: TextArg> TextArg for Option<T> {
    fn text(&self) -> Option<&str> {
        self.as_ref().and_then(TextArg::text)
    }
}

/// Reject null and blank text.
fn require<'a, A: TextArg + ?Sized>(name: &'static str, arg: &'a A) -> Result<&'a str, ArgumentError> {
    match arg.text() {
        None => Err(ArgumentError::Null { name }),
        Some(text) if text.trim().is_empty() => Err(ArgumentError::Blank { name }),
        Some(text) => Ok(text),
    }
}

fn typed<T>(outcome: Result<Outcome, BuildError>) -> Result<TypedOutcome<T>, BuildError> {
    Ok(TypedOutcome::try_from(outcome?)?)
}

// ============================================================================
// Builders
// ============================================================================

impl ResultManager {
    /// Untyped success.
    pub fn success(&self) -> Outcome {
        Outcome::Success
    }

    /// Typed success carrying `value`.
    pub fn success_with<T>(&self, value: Option<T>) -> TypedOutcome<T> {
        TypedOutcome::Success(value)
    }

    /// Typed success with no payload.
    pub fn success_typed<T>(&self) -> TypedOutcome<T> {
        TypedOutcome::Success(None)
    }

    /// Malformed request. The description is `message` itself.
    pub async fn bad_request(&self, ctx: &RequestContext, message: impl TextArg) -> Result<Outcome, BuildError> {
        let message = require("message", &message)?;
        let context = Self::preamble(ctx, definitions::BAD_REQUEST);
        self.fail(ctx, definitions::BAD_REQUEST, definitions::BAD_REQUEST, &[message], context)
            .await
    }

    /// Malformed request caused by validation failures.
    ///
    /// Classified as a bad request; the description counts the failures and
    /// the failures themselves go to `errors`.
    pub async fn bad_request_with_failures(
        &self,
        ctx: &RequestContext,
        failures: &[ValidationFailure],
    ) -> Result<Outcome, BuildError> {
        let context = Self::preamble(ctx, definitions::BAD_REQUEST).serialize("failures", keys::ERRORS, failures)?;
        let count = failures.len().to_string();
        self.fail(ctx, definitions::BAD_REQUEST, definitions::VALIDATION_FAILED, &[&count], context)
            .await
    }

    /// Validation failures.
    pub async fn validation(&self, ctx: &RequestContext, failures: &[ValidationFailure]) -> Result<Outcome, BuildError> {
        let context =
            Self::preamble(ctx, definitions::VALIDATION_FAILED).serialize("failures", keys::ERRORS, failures)?;
        let count = failures.len().to_string();
        self.fail(ctx, definitions::VALIDATION_FAILED, definitions::VALIDATION_FAILED, &[&count], context)
            .await
    }

    /// An `entity` whose `property_name` equals `property_value` already exists.
    pub async fn resource_already_exists(
        &self,
        ctx: &RequestContext,
        entity: impl TextArg,
        property_name: impl TextArg,
        property_value: impl TextArg,
    ) -> Result<Outcome, BuildError> {
        let entity = require("entity", &entity)?;
        let property_name = require("propertyName", &property_name)?;
        let property_value = require("propertyValue", &property_value)?;
        self.entity_lookup(ctx, definitions::RESOURCE_ALREADY_EXISTS, entity, property_name, property_value)
            .await
    }

    /// No `entity` has `property_name` equal to `property_value`.
    pub async fn resource_not_found(
        &self,
        ctx: &RequestContext,
        entity: impl TextArg,
        property_name: impl TextArg,
        property_value: impl TextArg,
    ) -> Result<Outcome, BuildError> {
        let entity = require("entity", &entity)?;
        let property_name = require("propertyName", &property_name)?;
        let property_value = require("propertyValue", &property_value)?;
        self.entity_lookup(ctx, definitions::RESOURCE_NOT_FOUND, entity, property_name, property_value)
            .await
    }

    async fn entity_lookup(
        &self,
        ctx: &RequestContext,
        code: ErrorCode,
        entity: &str,
        property_name: &str,
        property_value: &str,
    ) -> Result<Outcome, BuildError> {
        let context = Self::preamble(ctx, code)
            .text(keys::ENTITY, Some(entity))
            .text(keys::PROPERTY_NAME, Some(property_name))
            .text(keys::PROPERTY_VALUE, Some(property_value));
        self.fail(ctx, code, code, &[entity, property_name, property_value], context)
            .await
    }

    /// Creating `resource_name` from `new_resource` failed.
    pub async fn resource_create_failed<R>(
        &self,
        ctx: &RequestContext,
        resource_name: impl TextArg,
        new_resource: &R,
    ) -> Result<Outcome, BuildError>
    where
        R: Serialize + ?Sized,
    {
        let resource_name = require("resourceName", &resource_name)?;
        let context = Self::preamble(ctx, definitions::RESOURCE_CREATE_FAILED)
            .text(keys::RESOURCE, Some(resource_name))
            .serialize("newResource", keys::NEW_RESOURCE, new_resource)?;
        self.fail(
            ctx,
            definitions::RESOURCE_CREATE_FAILED,
            definitions::RESOURCE_CREATE_FAILED,
            &[resource_name],
            context,
        )
        .await
    }

    /// Updating `resource_name` to `updated_resource` failed.
    ///
    /// `previous_resource` is the state before the update, when known.
    pub async fn resource_update_failed<U, P, I, S>(
        &self,
        ctx: &RequestContext,
        resource_name: impl TextArg,
        updated_resource: &U,
        previous_resource: Option<&P>,
        reasons: I,
    ) -> Result<Outcome, BuildError>
    where
        U: Serialize + ?Sized,
        P: Serialize + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resource_name = require("resourceName", &resource_name)?;
        let context = Self::preamble(ctx, definitions::RESOURCE_UPDATE_FAILED).text(keys::RESOURCE, Some(resource_name));
        let context = match previous_resource {
            Some(previous) => context.serialize("previousResource", keys::PREVIOUS_RESOURCE, previous)?,
            None => context.field(keys::PREVIOUS_RESOURCE, None),
        };
        let context = context
            .serialize("updatedResource", keys::UPDATED_RESOURCE, updated_resource)?
            .strings(keys::REASONS, reasons);

        self.fail(
            ctx,
            definitions::RESOURCE_UPDATE_FAILED,
            definitions::RESOURCE_UPDATE_FAILED,
            &[resource_name],
            context,
        )
        .await
    }

    /// Deleting `resource` failed.
    pub async fn resource_delete_failed<I, S>(
        &self,
        ctx: &RequestContext,
        resource: impl TextArg,
        reasons: I,
    ) -> Result<Outcome, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resource = require("resource", &resource)?;
        let context = Self::preamble(ctx, definitions::RESOURCE_DELETE_FAILED)
            .text(keys::RESOURCE, Some(resource))
            .strings(keys::REASONS, reasons);
        self.fail(
            ctx,
            definitions::RESOURCE_DELETE_FAILED,
            definitions::RESOURCE_DELETE_FAILED,
            &[resource],
            context,
        )
        .await
    }

    /// Applying `patches` to `resource_name` failed.
    pub async fn resource_patch_failed<M>(
        &self,
        ctx: &RequestContext,
        resource_name: impl TextArg,
        patches: &M,
    ) -> Result<Outcome, BuildError>
    where
        M: Serialize + ?Sized,
    {
        let resource_name = require("resourceName", &resource_name)?;
        let context = Self::preamble(ctx, definitions::RESOURCE_PATCH_FAILED)
            .text(keys::RESOURCE, Some(resource_name))
            .serialize("patches", keys::PATCHES, patches)?;
        self.fail(
            ctx,
            definitions::RESOURCE_PATCH_FAILED,
            definitions::RESOURCE_PATCH_FAILED,
            &[resource_name],
            context,
        )
        .await
    }

    /// The caller is not authenticated for `resource`.
    pub async fn unauthorized(&self, ctx: &RequestContext, resource: impl TextArg) -> Result<Outcome, BuildError> {
        let resource = require("resource", &resource)?;
        let context = Self::preamble(ctx, definitions::UNAUTHORIZED).text(keys::RESOURCE, Some(resource));
        self.fail(ctx, definitions::UNAUTHORIZED, definitions::UNAUTHORIZED, &[resource], context)
            .await
    }

    /// The caller may not perform this action.
    ///
    /// `resource` is taken from the request context and is null outside a
    /// request.
    pub async fn forbidden(&self, ctx: &RequestContext) -> Result<Outcome, BuildError> {
        let context = Self::preamble(ctx, definitions::FORBIDDEN).text(keys::RESOURCE, ctx.resource());
        self.fail(ctx, definitions::FORBIDDEN, definitions::FORBIDDEN, &[], context)
            .await
    }

    /// Anything the other categories do not cover. `message` is kept raw in
    /// `detail`.
    pub async fn unexpected_error(&self, ctx: &RequestContext, message: impl TextArg) -> Result<Outcome, BuildError> {
        let message = require("message", &message)?;
        let context = Self::preamble(ctx, definitions::UNEXPECTED_ERROR).text(keys::DETAIL, Some(message));
        self.fail(ctx, definitions::UNEXPECTED_ERROR, definitions::UNEXPECTED_ERROR, &[message], context)
            .await
    }

    /// `operation` was abandoned because the request was cancelled.
    ///
    /// This is the one builder that ignores the request's token: it is
    /// called once that token has fired.
    pub async fn request_cancelled(&self, ctx: &RequestContext, operation: impl TextArg) -> Result<Outcome, BuildError> {
        let operation = require("operation", &operation)?;
        let live = ctx.clone().with_cancellation(CancellationToken::new());
        let context = Self::preamble(&live, definitions::REQUEST_CANCELLED).text(keys::OPERATION, Some(operation));
        self.fail(&live, definitions::REQUEST_CANCELLED, definitions::REQUEST_CANCELLED, &[operation], context)
            .await
    }

    /// Failure for any code, typically one added through a custom catalog.
    ///
    /// `args` fill the template's placeholders in order; `extras` follow
    /// the leading context fields and may not use their keys
    /// ([`keys::RESERVED`]).
    pub async fn failure<I, K>(
        &self,
        ctx: &RequestContext,
        code: ErrorCode,
        args: &[&str],
        extras: I,
    ) -> Result<Outcome, BuildError>
    where
        I: IntoIterator<Item = (K, Option<Value>)>,
        K: Into<Cow<'static, str>>,
    {
        for arg in args {
            require("args", *arg)?;
        }
        let mut context = Self::preamble(ctx, code);
        for (key, value) in extras {
            let key: Cow<'static, str> = key.into();
            if keys::RESERVED.contains(&&*key) {
                return Err(ArgumentError::Reserved {
                    name: "extras",
                    key: key.into_owned(),
                }
                .into());
            }
            context = context.field(key, value);
        }
        self.fail(ctx, code, code, args, context).await
    }

    // ------------------------------------------------------------------------
    // Typed twins
    // ------------------------------------------------------------------------

    /// Typed [`bad_request`](Self::bad_request).
    pub async fn bad_request_typed<T>(
        &self,
        ctx: &RequestContext,
        message: impl TextArg,
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.bad_request(ctx, message).await)
    }

    /// Typed [`bad_request_with_failures`](Self::bad_request_with_failures).
    pub async fn bad_request_with_failures_typed<T>(
        &self,
        ctx: &RequestContext,
        failures: &[ValidationFailure],
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.bad_request_with_failures(ctx, failures).await)
    }

    /// Typed [`validation`](Self::validation).
    pub async fn validation_typed<T>(
        &self,
        ctx: &RequestContext,
        failures: &[ValidationFailure],
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.validation(ctx, failures).await)
    }

    /// Typed [`resource_already_exists`](Self::resource_already_exists).
    pub async fn resource_already_exists_typed<T>(
        &self,
        ctx: &RequestContext,
        entity: impl TextArg,
        property_name: impl TextArg,
        property_value: impl TextArg,
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(
            self.resource_already_exists(ctx, entity, property_name, property_value)
                .await,
        )
    }

    /// Typed [`resource_not_found`](Self::resource_not_found).
    pub async fn resource_not_found_typed<T>(
        &self,
        ctx: &RequestContext,
        entity: impl TextArg,
        property_name: impl TextArg,
        property_value: impl TextArg,
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.resource_not_found(ctx, entity, property_name, property_value).await)
    }

    /// Typed [`resource_create_failed`](Self::resource_create_failed).
    pub async fn resource_create_failed_typed<T, R>(
        &self,
        ctx: &RequestContext,
        resource_name: impl TextArg,
        new_resource: &R,
    ) -> Result<TypedOutcome<T>, BuildError>
    where
        R: Serialize + ?Sized,
    {
        typed(self.resource_create_failed(ctx, resource_name, new_resource).await)
    }

    /// Typed [`resource_update_failed`](Self::resource_update_failed).
    pub async fn resource_update_failed_typed<T, U, P, I, S>(
        &self,
        ctx: &RequestContext,
        resource_name: impl TextArg,
        updated_resource: &U,
        previous_resource: Option<&P>,
        reasons: I,
    ) -> Result<TypedOutcome<T>, BuildError>
    where
        U: Serialize + ?Sized,
        P: Serialize + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        typed(
            self.resource_update_failed(ctx, resource_name, updated_resource, previous_resource, reasons)
                .await,
        )
    }

    /// Typed [`resource_delete_failed`](Self::resource_delete_failed).
    pub async fn resource_delete_failed_typed<T, I, S>(
        &self,
        ctx: &RequestContext,
        resource: impl TextArg,
        reasons: I,
    ) -> Result<TypedOutcome<T>, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        typed(self.resource_delete_failed(ctx, resource, reasons).await)
    }

    /// Typed [`resource_patch_failed`](Self::resource_patch_failed).
    pub async fn resource_patch_failed_typed<T, M>(
        &self,
        ctx: &RequestContext,
        resource_name: impl TextArg,
        patches: &M,
    ) -> Result<TypedOutcome<T>, BuildError>
    where
        M: Serialize + ?Sized,
    {
        typed(self.resource_patch_failed(ctx, resource_name, patches).await)
    }

    /// Typed [`unauthorized`](Self::unauthorized).
    pub async fn unauthorized_typed<T>(
        &self,
        ctx: &RequestContext,
        resource: impl TextArg,
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.unauthorized(ctx, resource).await)
    }

    /// Typed [`forbidden`](Self::forbidden).
    pub async fn forbidden_typed<T>(&self, ctx: &RequestContext) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.forbidden(ctx).await)
    }

    /// Typed [`unexpected_error`](Self::unexpected_error).
    pub async fn unexpected_error_typed<T>(
        &self,
        ctx: &RequestContext,
        message: impl TextArg,
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.unexpected_error(ctx, message).await)
    }

    /// Typed [`request_cancelled`](Self::request_cancelled).
    pub async fn request_cancelled_typed<T>(
        &self,
        ctx: &RequestContext,
        operation: impl TextArg,
    ) -> Result<TypedOutcome<T>, BuildError> {
        typed(self.request_cancelled(ctx, operation).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_args_accept_owned_borrowed_and_optional() {
        let owned = String::from("User");
        assert_eq!(require("entity", &"User"), Ok("User"));
        assert_eq!(require("entity", &owned), Ok("User"));
        assert_eq!(require("entity", &&owned), Ok("User"));
        assert_eq!(require("entity", &Some("User")), Ok("User"));
        assert_eq!(require("entity", &Some(owned.clone())), Ok("User"));
        assert_eq!(require("entity", &Cow::Borrowed("User")), Ok("User"));
    }

    #[test]
    fn null_and_blank_are_told_apart() {
        assert_eq!(require("entity", &None::<&str>), Err(ArgumentError::Null { name: "entity" }));
        assert_eq!(require("entity", &None::<String>), Err(ArgumentError::Null { name: "entity" }));
        assert_eq!(require("entity", &""), Err(ArgumentError::Blank { name: "entity" }));
        assert_eq!(require("entity", &" \t"), Err(ArgumentError::Blank { name: "entity" }));
        assert_eq!(require("entity", &Some("  ")), Err(ArgumentError::Blank { name: "entity" }));
    }

    #[test]
    fn typed_passes_argument_errors_through() {
        let err = typed::<u8>(Err(ArgumentError::Null { name: "message" }.into())).unwrap_err();
        assert_eq!(err.as_argument(), Some(&ArgumentError::Null { name: "message" }));

        let err = typed::<u8>(Ok(Outcome::Success)).unwrap_err();
        assert_eq!(err, BuildError::Conversion(crate::ConversionError));
    }
}
