//! Error code namespace - stable identifiers for failure categories.
//!
//! An [`ErrorCode`] names *what kind* of failure happened. It never carries a
//! message or any request data; those are resolved later through the catalog
//! and the resolver. Codes are plain numbers so that consumers can mint their
//! own codes next to the built-in ones and register them with a
//! [`Catalog`](crate::Catalog).
//!
//! # Governance
//!
//! Built-in codes are grouped in ranges (see [`ranges`]) and are never reused
//! for a different meaning. A code that no catalog entry knows about is still
//! a valid code: resolution falls back to the unexpected-error entry.
//!
//! # Example
//!
//! ```rust
//! use result_manager::{ErrorCode, define_error_codes};
//!
//! define_error_codes! {
//!     PAYMENT_DECLINED = 1000,
//!     PAYMENT_EXPIRED = 1001,
//! }
//!
//! assert_eq!(PAYMENT_DECLINED.to_string(), "E-PRB-1000");
//! assert!(PAYMENT_DECLINED < PAYMENT_EXPIRED);
//! ```

use std::borrow::Cow;
use std::fmt;

/// Code ranges reserved for the built-in catalog.
pub mod ranges {
    pub const CORE_START: u16 = 1;
    pub const CORE_END: u16 = 99;
    pub const REQUEST_START: u16 = 100;
    pub const REQUEST_END: u16 = 199;
    pub const ACCESS_START: u16 = 200;
    pub const ACCESS_END: u16 = 299;
    pub const RESOURCE_START: u16 = 300;
    pub const RESOURCE_END: u16 = 399;
    pub const LIFECYCLE_START: u16 = 900;
    pub const LIFECYCLE_END: u16 = 999;
}

/// Opaque, totally ordered identifier of a failure category.
///
/// Comparison and hashing use the numeric value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a code from its numeric value.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the numeric value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Whether this code belongs to the built-in catalog.
    #[inline]
    pub fn is_builtin(self) -> bool {
        crate::definitions::builtin_entry(self).is_some()
    }
}

impl From<u16> for ErrorCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl fmt::Display for ErrorCode {
    /// Writes directly to the formatter, e.g. `E-PRB-301`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-PRB-{:03}", self.0)
    }
}

/// Base URI shared by every built-in classification.
pub const PROBLEM_TYPE_BASE: &str = "https://support.sondor-technology.co.uk/problems";

/// Stable, locale-independent tag naming the kind of problem.
///
/// Built-in classifications are static URIs below [`PROBLEM_TYPE_BASE`].
/// Custom catalogs may use any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorClassification(Cow<'static, str>);

impl ErrorClassification {
    /// Classification backed by a static string.
    #[inline]
    pub const fn from_static(uri: &'static str) -> Self {
        Self(Cow::Borrowed(uri))
    }

    /// Classification backed by a runtime string.
    #[inline]
    pub fn new(uri: impl Into<Cow<'static, str>>) -> Self {
        Self(uri.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ErrorClassification {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Define one error code as a `pub const`.
///
/// ```rust
/// # use result_manager::define_error_code;
/// define_error_code!(QUOTA_EXCEEDED, 1200);
/// assert_eq!(QUOTA_EXCEEDED.value(), 1200);
/// ```
#[macro_export]
macro_rules! define_error_code {
    ($name:ident, $code:expr) => {
        pub const $name: $crate::ErrorCode = $crate::ErrorCode::new($code);
    };
}

/// Define several error codes at once.
#[macro_export]
macro_rules! define_error_codes {
    ($( $name:ident = $code:expr ),+ $(,)?) => {
        $(
            $crate::define_error_code!($name, $code);
        )+
    };
}

/// Define classification constants relative to [`PROBLEM_TYPE_BASE`].
macro_rules! define_classifications {
    ($( $(#[$meta:meta])* $name:ident = $path:literal ),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub const $name: ErrorClassification = ErrorClassification::from_static(
                concat!("https://support.sondor-technology.co.uk/problems", $path),
            );
        )+
    };
}

/// Built-in classifications.
pub mod classifications {
    use super::ErrorClassification;

    define_classifications! {
        /// Anything the catalog does not know about.
        UNEXPECTED_ERROR = "/unexpected-error",
        BAD_REQUEST = "/bad-request",
        VALIDATION_FAILED = "/validation-failed",
        UNAUTHORIZED = "/unauthorized",
        FORBIDDEN = "/forbidden",
        RESOURCE_NOT_FOUND = "/resource-not-found",
        /// Resource already exists.
        CONFLICT = "/conflict",
        RESOURCE_CREATE_FAILED = "/resource-creation-failed",
        RESOURCE_UPDATE_FAILED = "/resource-update-failed",
        RESOURCE_DELETE_FAILED = "/resource-delete-failed",
        RESOURCE_PATCH_FAILED = "/resource-patch-failed",
        REQUEST_CANCELLED = "/request-cancelled",
    }
}
