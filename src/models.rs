//! Error and outcome values.
//!
//! # Architecture
//!
//! - [`ErrorValue`]: immutable description of one failure (code,
//!   classification, rendered description, context bag).
//! - [`Outcome`]: untyped success-or-failure returned by operations with no
//!   payload.
//! - [`TypedOutcome`]: the same, with an optional payload on success.
//!
//! An outcome holds either a payload or an error, never both. Values are
//! built once by a builder and have no mutation API; they are `Send + Sync`
//! and can be shared freely.
//!
//! # Conversion
//!
//! A typed failure is produced from an untyped one with
//! `TypedOutcome::<T>::try_from(outcome)`. Converting a *successful* untyped
//! outcome is a caller bug and returns [`ConversionError`] instead of
//! inventing a payload.

use std::fmt;

use crate::{ArgumentError, ContextBag, ConversionError, ErrorClassification, ErrorCode, ProblemLog};

// ============================================================================
// Error Value
// ============================================================================

/// One structured failure.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "errors should be returned or logged"]
pub struct ErrorValue {
    code: ErrorCode,
    classification: ErrorClassification,
    description: String,
    context: ContextBag,
}

impl ErrorValue {
    /// Assemble an error value.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Blank`] if `description` is empty or
    /// whitespace.
    pub fn new(
        code: ErrorCode,
        classification: ErrorClassification,
        description: impl Into<String>,
        context: ContextBag,
    ) -> Result<Self, ArgumentError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ArgumentError::Blank { name: "description" });
        }

        Ok(Self {
            code,
            classification,
            description,
            context,
        })
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    #[inline]
    pub fn classification(&self) -> &ErrorClassification {
        &self.classification
    }

    /// Rendered, human-readable description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn context(&self) -> &ContextBag {
        &self.context
    }

    /// Borrowed structured view for logging.
    #[inline]
    pub fn log_entry(&self) -> ProblemLog<'_> {
        ProblemLog::new(self)
    }
}

impl fmt::Display for ErrorValue {
    /// Format: `"{description} ({code})"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.code)
    }
}

impl std::error::Error for ErrorValue {}

// ============================================================================
// Untyped Outcome
// ============================================================================

/// Success or failure with no payload.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "outcomes carry failures that should be handled"]
pub enum Outcome {
    Success,
    Failure(ErrorValue),
}

impl Outcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The error, if this is a failure.
    #[inline]
    pub fn error(&self) -> Option<&ErrorValue> {
        match self {
            Self::Success => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Convert into a standard `Result` for `?` propagation.
    pub fn into_result(self) -> Result<(), ErrorValue> {
        match self {
            Self::Success => Ok(()),
            Self::Failure(error) => Err(error),
        }
    }
}

impl From<ErrorValue> for Outcome {
    fn from(error: ErrorValue) -> Self {
        Self::Failure(error)
    }
}

// ============================================================================
// Typed Outcome
// ============================================================================

/// Success with an optional payload, or failure.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "outcomes carry failures that should be handled"]
pub enum TypedOutcome<T> {
    Success(Option<T>),
    Failure(ErrorValue),
}

impl<T> TypedOutcome<T> {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The payload, if this is a success that carries one.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => value.as_ref(),
            Self::Failure(_) => None,
        }
    }

    #[inline]
    pub fn error(&self) -> Option<&ErrorValue> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Convert into a standard `Result` for `?` propagation.
    pub fn into_result(self) -> Result<Option<T>, ErrorValue> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }

    /// Map the payload, keeping failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TypedOutcome<U> {
        match self {
            Self::Success(value) => TypedOutcome::Success(value.map(f)),
            Self::Failure(error) => TypedOutcome::Failure(error),
        }
    }
}

impl<T> From<ErrorValue> for TypedOutcome<T> {
    fn from(error: ErrorValue) -> Self {
        Self::Failure(error)
    }
}

impl<T> TryFrom<Outcome> for TypedOutcome<T> {
    type Error = ConversionError;

    fn try_from(outcome: Outcome) -> Result<Self, Self::Error> {
        match outcome {
            Outcome::Failure(error) => Ok(Self::Failure(error)),
            Outcome::Success => Err(ConversionError),
        }
    }
}
