//! Request context and the error context bag.
//!
//! - [`RequestContext`]: what a builder knows about the current request
//!   (trace id, current resource, cancellation). Passed explicitly to every
//!   builder call; nothing here is read from process-wide state.
//! - [`ContextBag`]: ordered, key-unique map of auxiliary error fields.
//! - [`ContextBuilder`]: fluent construction of a bag.
//!
//! # Example
//!
//! ```rust
//! use result_manager::{ContextBuilder, keys};
//!
//! let bag = ContextBuilder::new()
//!     .text(keys::TRACE_ID, Some("trace-1"))
//!     .text(keys::ENTITY, Some("User"))
//!     .build();
//!
//! assert_eq!(bag.len(), 2);
//! assert_eq!(bag.get_str(keys::ENTITY), Some("User"));
//! ```

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{ArgumentError, ErrorCode};

/// Well-known context keys.
pub mod keys {
    pub const TRACE_ID: &str = "traceId";
    pub const CODE: &str = "code";
    pub const MESSAGE: &str = "message";
    pub const ENTITY: &str = "entity";
    pub const PROPERTY_NAME: &str = "propertyName";
    pub const PROPERTY_VALUE: &str = "propertyValue";
    pub const RESOURCE: &str = "resource";
    pub const NEW_RESOURCE: &str = "newResource";
    pub const PREVIOUS_RESOURCE: &str = "previousResource";
    pub const UPDATED_RESOURCE: &str = "updatedResource";
    pub const REASONS: &str = "reasons";
    pub const ERRORS: &str = "errors";
    pub const PATCHES: &str = "patches";
    pub const DETAIL: &str = "detail";
    pub const OPERATION: &str = "operation";

    /// Keys every failure starts with; caller extras may not replace them.
    pub const RESERVED: [&str; 3] = [TRACE_ID, CODE, MESSAGE];
}

// ============================================================================
// Request Context
// ============================================================================

/// Per-request facts a builder may need.
///
/// Every field is optional: a builder called outside a request still works
/// and records `null` for what it cannot know.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    trace_id: Option<String>,
    resource: Option<String>,
    locale: Option<String>,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Context with a trace identifier.
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(trace_id.into()),
            ..Self::default()
        }
    }

    /// Context with nothing known about the request.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Set the identifier of the resource/route being served.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Request messages in `locale`, e.g. from `Accept-Language`.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Use an existing cancellation token, e.g. the connection's.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[inline]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Requested locale; `None` means the translator's default.
    #[inline]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    #[inline]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

// ============================================================================
// Context Bag
// ============================================================================

/// Ordered map of auxiliary error fields.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// `None` marks a field that is known to be relevant but has no value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContextBag {
    entries: IndexMap<Cow<'static, str>, Option<Value>>,
}

impl ContextBag {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value for `key`. `Some(None)` means the key is present with no value.
    #[inline]
    pub fn get(&self, key: &str) -> Option<Option<&Value>> {
        self.entries.get(key).map(Option::as_ref)
    }

    /// String value for `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).flatten().and_then(Value::as_str)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| key.as_ref())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(key, value)| (key.as_ref(), value.as_ref()))
    }
}

// ============================================================================
// Context Builder
// ============================================================================

/// Fluent builder for [`ContextBag`].
#[derive(Debug, Default)]
pub struct ContextBuilder {
    bag: ContextBag,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw value.
    pub fn field(mut self, key: impl Into<Cow<'static, str>>, value: Option<Value>) -> Self {
        self.bag.entries.insert(key.into(), value);
        self
    }

    /// Insert an optional string.
    pub fn text(self, key: impl Into<Cow<'static, str>>, value: Option<&str>) -> Self {
        self.field(key, value.map(|text| Value::String(text.to_owned())))
    }

    /// Insert an error code as its numeric value.
    pub fn code(self, key: impl Into<Cow<'static, str>>, code: ErrorCode) -> Self {
        self.field(key, Some(Value::from(code.value())))
    }

    /// Insert a list of strings.
    pub fn strings<I, S>(self, key: impl Into<Cow<'static, str>>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = values.into_iter().map(|value| Value::String(value.into())).collect();
        self.field(key, Some(Value::Array(list)))
    }

    /// Insert any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Unserializable`] naming `argument` when the
    /// value cannot be represented (e.g. a map with non-string keys).
    pub fn serialize<T: Serialize + ?Sized>(
        self,
        argument: &'static str,
        key: impl Into<Cow<'static, str>>,
        value: &T,
    ) -> Result<Self, ArgumentError> {
        let value = serde_json::to_value(value).map_err(|err| ArgumentError::Unserializable {
            name: argument,
            reason: err.to_string(),
        })?;
        Ok(self.field(key, Some(value)))
    }

    pub fn build(self) -> ContextBag {
        self.bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn request_context_defaults_to_unknown() {
        let ctx = RequestContext::detached();
        assert_eq!(ctx.trace_id(), None);
        assert_eq!(ctx.resource(), None);
        assert_eq!(ctx.locale(), None);
        assert!(!ctx.cancellation().is_cancelled());
    }

    #[test]
    fn request_context_carries_the_given_token() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new("trace-1")
            .with_resource("/users/1")
            .with_locale("fr")
            .with_cancellation(token.clone());
        token.cancel();

        assert_eq!(ctx.trace_id(), Some("trace-1"));
        assert_eq!(ctx.locale(), Some("fr"));
        assert_eq!(ctx.resource(), Some("/users/1"));
        assert!(ctx.cancellation().is_cancelled());
    }

    #[test]
    fn keys_stay_unique_and_ordered() {
        let bag = ContextBuilder::new()
            .text(keys::TRACE_ID, Some("a"))
            .text(keys::MESSAGE, Some("first"))
            .text(keys::TRACE_ID, Some("b"))
            .build();

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec![keys::TRACE_ID, keys::MESSAGE]);
        assert_eq!(bag.get_str(keys::TRACE_ID), Some("b"));
    }

    #[test]
    fn absent_values_are_present_keys() {
        let bag = ContextBuilder::new().text(keys::RESOURCE, None).build();
        assert!(bag.contains_key(keys::RESOURCE));
        assert_eq!(bag.get(keys::RESOURCE), Some(None));
        assert_eq!(bag.get("missing"), None);
    }

    #[test]
    fn nested_values_are_kept() {
        let mut patches = HashMap::new();
        patches.insert("name", Some("value"));
        let bag = ContextBuilder::new()
            .serialize("patches", keys::PATCHES, &patches)
            .unwrap()
            .strings(keys::REASONS, ["locked"])
            .build();

        assert_eq!(bag.get(keys::PATCHES).flatten(), Some(&serde_json::json!({"name": "value"})));
        assert_eq!(bag.get(keys::REASONS).flatten(), Some(&serde_json::json!(["locked"])));
    }

    #[test]
    fn non_string_map_keys_are_rejected() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");
        let err = ContextBuilder::new().serialize("resource", keys::NEW_RESOURCE, &map).unwrap_err();
        assert!(matches!(err, ArgumentError::Unserializable { name: "resource", .. }));
    }

    #[test]
    fn codes_are_numeric() {
        let bag = ContextBuilder::new().code(keys::CODE, ErrorCode::new(301)).build();
        assert_eq!(bag.get(keys::CODE).flatten(), Some(&serde_json::json!(301)));
    }
}
