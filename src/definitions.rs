//! Built-in error catalog.
//!
//! # Taxonomy
//!
//! Every built-in [`ErrorCode`] maps to exactly one [`CatalogEntry`]:
//! a classification URI, a short title, a default (English) message template
//! and the translation key a localized resolver asks for.
//!
//! | Range | Area |
//! |---|---|
//! | 001-099 | core (unexpected errors) |
//! | 100-199 | malformed requests and validation |
//! | 200-299 | authentication and authorization |
//! | 300-399 | resource lifecycle |
//! | 900-999 | request lifecycle (cancellation) |
//!
//! The table is total: lookups for codes it does not contain resolve to the
//! [`UNEXPECTED_ERROR`] entry. [`Catalog`] layers consumer entries on top of
//! the built-in table, so codes can be added or templates changed without
//! editing this file.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::codes::classifications;
use crate::{ArgumentError, ErrorClassification, ErrorCode, define_error_codes};

// -----------------------------------------------------------------------------
// CORE (001-099)
// -----------------------------------------------------------------------------
define_error_codes! {
    UNEXPECTED_ERROR = 1,
}

// -----------------------------------------------------------------------------
// REQUEST (100-199)
// -----------------------------------------------------------------------------
define_error_codes! {
    BAD_REQUEST = 100,
    VALIDATION_FAILED = 101,
}

// -----------------------------------------------------------------------------
// ACCESS (200-299)
// -----------------------------------------------------------------------------
define_error_codes! {
    UNAUTHORIZED = 200,
    FORBIDDEN = 201,
}

// -----------------------------------------------------------------------------
// RESOURCE (300-399)
// -----------------------------------------------------------------------------
define_error_codes! {
    RESOURCE_NOT_FOUND = 300,
    RESOURCE_ALREADY_EXISTS = 301,
    RESOURCE_CREATE_FAILED = 302,
    RESOURCE_UPDATE_FAILED = 303,
    RESOURCE_DELETE_FAILED = 304,
    RESOURCE_PATCH_FAILED = 305,
}

// -----------------------------------------------------------------------------
// LIFECYCLE (900-999)
// -----------------------------------------------------------------------------
define_error_codes! {
    REQUEST_CANCELLED = 900,
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    code: ErrorCode,
    name: Cow<'static, str>,
    classification: ErrorClassification,
    title: Cow<'static, str>,
    template: Cow<'static, str>,
    translation_key: Cow<'static, str>,
}

impl CatalogEntry {
    const fn builtin(
        code: ErrorCode,
        name: &'static str,
        classification: ErrorClassification,
        title: &'static str,
        template: &'static str,
        translation_key: &'static str,
    ) -> Self {
        Self {
            code,
            name: Cow::Borrowed(name),
            classification,
            title: Cow::Borrowed(title),
            template: Cow::Borrowed(template),
            translation_key: Cow::Borrowed(translation_key),
        }
    }

    /// Create a consumer-defined entry.
    ///
    /// The title defaults to the name. The translation key defaults to the
    /// built-in key when `code` replaces a built-in entry, and to the name
    /// otherwise; use [`with_title`](Self::with_title) and
    /// [`with_translation_key`](Self::with_translation_key) to change them.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Blank`] if the name, classification or
    /// template is empty or whitespace.
    pub fn new(
        code: ErrorCode,
        name: impl Into<Cow<'static, str>>,
        classification: ErrorClassification,
        template: impl Into<Cow<'static, str>>,
    ) -> Result<Self, ArgumentError> {
        let name = non_blank(name.into(), "name")?;
        if classification.as_str().trim().is_empty() {
            return Err(ArgumentError::Blank { name: "classification" });
        }
        let template = non_blank(template.into(), "template")?;
        let translation_key = match builtin_entry(code) {
            Some(builtin) => builtin.translation_key.clone(),
            None => name.clone(),
        };

        Ok(Self {
            code,
            title: name.clone(),
            translation_key,
            name,
            classification,
            template,
        })
    }

    /// Replace the title.
    pub fn with_title(mut self, title: impl Into<Cow<'static, str>>) -> Self {
        self.title = title.into();
        self
    }

    /// Replace the translation key.
    pub fn with_translation_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.translation_key = key.into();
        self
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Symbolic name, e.g. `ResourceNotFound`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn classification(&self) -> &ErrorClassification {
        &self.classification
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Default template, not yet interpolated.
    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline]
    pub fn translation_key(&self) -> &str {
        &self.translation_key
    }
}

fn non_blank(value: Cow<'static, str>, name: &'static str) -> Result<Cow<'static, str>, ArgumentError> {
    if value.trim().is_empty() {
        Err(ArgumentError::Blank { name })
    } else {
        Ok(value)
    }
}

/// Fallback entry for unknown codes.
static UNEXPECTED_ENTRY: CatalogEntry = CatalogEntry::builtin(
    UNEXPECTED_ERROR,
    "UnexpectedError",
    classifications::UNEXPECTED_ERROR,
    "Unexpected error!",
    "An unexpected error occurred: {0}",
    "problem.unexpected_error",
);

/// Built-in table, sorted by code.
static BUILTIN: [CatalogEntry; 11] = [
    CatalogEntry::builtin(
        BAD_REQUEST,
        "BadRequest",
        classifications::BAD_REQUEST,
        "Bad request!",
        "{0}",
        "problem.bad_request",
    ),
    CatalogEntry::builtin(
        VALIDATION_FAILED,
        "ValidationFailed",
        classifications::VALIDATION_FAILED,
        "Validation failed!",
        "{0} validation error(s) occurred.",
        "problem.validation_failed",
    ),
    CatalogEntry::builtin(
        UNAUTHORIZED,
        "Unauthorized",
        classifications::UNAUTHORIZED,
        "Unauthorized!",
        "You are not authorized to access {0}.",
        "problem.unauthorized",
    ),
    CatalogEntry::builtin(
        FORBIDDEN,
        "Forbidden",
        classifications::FORBIDDEN,
        "Permission denied!",
        "You do not have permission to perform this action.",
        "problem.forbidden",
    ),
    CatalogEntry::builtin(
        RESOURCE_NOT_FOUND,
        "ResourceNotFound",
        classifications::RESOURCE_NOT_FOUND,
        "Resource not found!",
        "{0} with {1} '{2}' was not found",
        "problem.resource_not_found",
    ),
    CatalogEntry::builtin(
        RESOURCE_ALREADY_EXISTS,
        "ResourceAlreadyExists",
        classifications::CONFLICT,
        "Resource already exists!",
        "{0} with {1} '{2}' already exists",
        "problem.resource_already_exists",
    ),
    CatalogEntry::builtin(
        RESOURCE_CREATE_FAILED,
        "ResourceCreateFailed",
        classifications::RESOURCE_CREATE_FAILED,
        "Resource creation failed!",
        "Failed to create {0}.",
        "problem.resource_create_failed",
    ),
    CatalogEntry::builtin(
        RESOURCE_UPDATE_FAILED,
        "ResourceUpdateFailed",
        classifications::RESOURCE_UPDATE_FAILED,
        "Resource update failed!",
        "Failed to update {0}.",
        "problem.resource_update_failed",
    ),
    CatalogEntry::builtin(
        RESOURCE_DELETE_FAILED,
        "ResourceDeleteFailed",
        classifications::RESOURCE_DELETE_FAILED,
        "Resource delete failed!",
        "Failed to delete {0}.",
        "problem.resource_delete_failed",
    ),
    CatalogEntry::builtin(
        RESOURCE_PATCH_FAILED,
        "ResourcePatchFailed",
        classifications::RESOURCE_PATCH_FAILED,
        "Resource patch failed!",
        "Failed to patch {0}.",
        "problem.resource_patch_failed",
    ),
    CatalogEntry::builtin(
        REQUEST_CANCELLED,
        "RequestCancelled",
        classifications::REQUEST_CANCELLED,
        "Request cancelled!",
        "The operation '{0}' was cancelled.",
        "problem.request_cancelled",
    ),
];

/// Look up a built-in entry without fallback.
pub fn builtin_entry(code: ErrorCode) -> Option<&'static CatalogEntry> {
    if code == UNEXPECTED_ERROR {
        return Some(&UNEXPECTED_ENTRY);
    }
    BUILTIN
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|index| &BUILTIN[index])
}

/// Every built-in entry, ordered by code.
pub fn builtin_entries() -> impl Iterator<Item = &'static CatalogEntry> {
    std::iter::once(&UNEXPECTED_ENTRY).chain(BUILTIN.iter())
}

/// The built-in table plus consumer overrides.
///
/// Lookups consult the overrides first, then the built-in table, then fall
/// back to the unexpected-error entry (which may itself be overridden).
///
/// ```rust
/// use result_manager::{Catalog, CatalogEntry, ErrorClassification, ErrorCode, definitions};
///
/// let catalog = Catalog::builtin()
///     .with_entry(CatalogEntry::new(
///         ErrorCode::new(1000),
///         "PaymentDeclined",
///         ErrorClassification::from_static("https://example.com/problems/payment-declined"),
///         "Payment {0} was declined.",
///     ).unwrap());
///
/// assert_eq!(catalog.resolve(ErrorCode::new(1000)).name(), "PaymentDeclined");
/// assert_eq!(catalog.resolve(ErrorCode::new(4242)).code(), definitions::UNEXPECTED_ERROR);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    overrides: BTreeMap<ErrorCode, CatalogEntry>,
}

impl Catalog {
    /// The built-in table with no overrides.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Add a code or replace the entry of an existing one.
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.overrides.insert(entry.code, entry);
        self
    }

    /// Entry registered for `code`, without fallback.
    pub fn entry(&self, code: ErrorCode) -> Option<&CatalogEntry> {
        self.overrides.get(&code).or_else(|| builtin_entry(code))
    }

    /// Whether `code` has its own entry.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.entry(code).is_some()
    }

    /// Entry for `code`, falling back to the unexpected-error entry.
    pub fn resolve(&self, code: ErrorCode) -> &CatalogEntry {
        self.entry(code)
            .or_else(|| self.overrides.get(&UNEXPECTED_ERROR))
            .unwrap_or(&UNEXPECTED_ENTRY)
    }

    #[inline]
    pub fn classify(&self, code: ErrorCode) -> ErrorClassification {
        self.resolve(code).classification.clone()
    }

    #[inline]
    pub fn title(&self, code: ErrorCode) -> &str {
        self.resolve(code).title()
    }

    /// Every known code, ascending.
    pub fn codes(&self) -> Vec<ErrorCode> {
        let mut codes: Vec<ErrorCode> = builtin_entries()
            .map(CatalogEntry::code)
            .chain(self.overrides.keys().copied())
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::ranges;

    #[test]
    fn builtin_table_is_sorted_and_unique() {
        let codes: Vec<_> = builtin_entries().map(CatalogEntry::code).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn enforce_code_ranges() {
        assert!(UNEXPECTED_ERROR.value() >= ranges::CORE_START && UNEXPECTED_ERROR.value() <= ranges::CORE_END);
        assert!(BAD_REQUEST.value() >= ranges::REQUEST_START && VALIDATION_FAILED.value() <= ranges::REQUEST_END);
        assert!(UNAUTHORIZED.value() >= ranges::ACCESS_START && FORBIDDEN.value() <= ranges::ACCESS_END);
        assert!(RESOURCE_NOT_FOUND.value() >= ranges::RESOURCE_START);
        assert!(RESOURCE_PATCH_FAILED.value() <= ranges::RESOURCE_END);
        assert!(REQUEST_CANCELLED.value() >= ranges::LIFECYCLE_START && REQUEST_CANCELLED.value() <= ranges::LIFECYCLE_END);
    }

    #[test]
    fn every_builtin_entry_is_complete() {
        for entry in builtin_entries() {
            assert!(!entry.name().is_empty());
            assert!(!entry.title().is_empty());
            assert!(!entry.template().trim().is_empty());
            assert!(entry.translation_key().starts_with("problem."));
            assert!(entry.code().is_builtin());
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        let catalog = Catalog::builtin();
        let entry = catalog.resolve(ErrorCode::new(777));
        assert_eq!(entry.code(), UNEXPECTED_ERROR);
        assert_eq!(catalog.classify(ErrorCode::new(777)), classifications::UNEXPECTED_ERROR);
        assert!(!catalog.contains(ErrorCode::new(777)));
    }

    #[test]
    fn overrides_replace_templates_only_for_their_code() {
        let entry = CatalogEntry::new(
            RESOURCE_NOT_FOUND,
            "ResourceNotFound",
            classifications::RESOURCE_NOT_FOUND,
            "No {0} matched {1}={2}",
        )
        .unwrap()
        .with_title("Missing!");
        let catalog = Catalog::builtin().with_entry(entry);

        assert_eq!(catalog.resolve(RESOURCE_NOT_FOUND).template(), "No {0} matched {1}={2}");
        assert_eq!(catalog.title(RESOURCE_NOT_FOUND), "Missing!");
        assert_eq!(catalog.resolve(FORBIDDEN).template(), builtin_entry(FORBIDDEN).unwrap().template());
        assert_eq!(catalog.codes().len(), builtin_entries().count());
        assert_eq!(catalog.resolve(RESOURCE_NOT_FOUND).translation_key(), "problem.resource_not_found");
    }

    #[test]
    fn translation_keys_default_by_code() {
        let custom = CatalogEntry::new(ErrorCode::new(1000), "PaymentDeclined", classifications::BAD_REQUEST, "{0}")
            .unwrap();
        assert_eq!(custom.translation_key(), "PaymentDeclined");

        let rekeyed = CatalogEntry::new(FORBIDDEN, "Forbidden", classifications::FORBIDDEN, "No.")
            .unwrap()
            .with_translation_key("access.denied");
        assert_eq!(rekeyed.translation_key(), "access.denied");
    }

    #[test]
    fn resolving_unknown_codes_is_repeatable() {
        let catalog = Catalog::builtin();
        let first = catalog.resolve(ErrorCode::new(4242)) as *const CatalogEntry;
        let second = catalog.resolve(ErrorCode::new(4242)) as *const CatalogEntry;
        assert_eq!(first, second);
    }

    #[test]
    fn overriding_the_fallback_changes_unknown_resolution() {
        let fallback = CatalogEntry::new(
            UNEXPECTED_ERROR,
            "UnexpectedError",
            ErrorClassification::from_static("urn:problem:internal"),
            "Internal failure: {0}",
        )
        .unwrap();
        let catalog = Catalog::builtin().with_entry(fallback);
        assert_eq!(catalog.classify(ErrorCode::new(4040)).as_str(), "urn:problem:internal");
    }

    #[test]
    fn custom_entries_reject_blank_fields() {
        let err = CatalogEntry::new(ErrorCode::new(1000), "Custom", classifications::BAD_REQUEST, "  ").unwrap_err();
        assert_eq!(err, ArgumentError::Blank { name: "template" });

        let err = CatalogEntry::new(
            ErrorCode::new(1000),
            "Custom",
            ErrorClassification::new(String::new()),
            "{0}",
        )
        .unwrap_err();
        assert_eq!(err, ArgumentError::Blank { name: "classification" });
    }
}
