//! Failures that are *not* domain outcomes.
//!
//! Domain failures travel as [`Outcome::Failure`](crate::Outcome). Everything
//! in this module is a different tier: caller bugs (bad arguments, illegal
//! conversions) and infrastructure problems while resolving a message
//! (cancellation, translation backend trouble). Builders return these through
//! `Err` and never fold them into an outcome.

use thiserror::Error;

use crate::ErrorCode;

/// Contract violation on a builder or constructor argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// Required argument was absent.
    #[error("{name} cannot be null")]
    Null { name: &'static str },
    /// Required argument was empty or whitespace only.
    #[error("{name} cannot be empty or whitespace")]
    Blank { name: &'static str },
    /// Payload argument could not be captured as a context value.
    #[error("{name} could not be serialized: {reason}")]
    Unserializable { name: &'static str, reason: String },
    /// Extra context entry used a key the builder owns.
    #[error("{name} cannot use the reserved key '{key}'")]
    Reserved { name: &'static str, key: String },
}

impl ArgumentError {
    /// Name of the offending argument.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null { name }
            | Self::Blank { name }
            | Self::Unserializable { name, .. }
            | Self::Reserved { name, .. } => name,
        }
    }
}

/// Failure reported by a [`Translator`](crate::Translator).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// No template registered for the key in the requested or default locale.
    #[error("no translation for key '{key}' in locale '{locale}'")]
    MissingKey { key: String, locale: String },
    /// Backend could not be reached.
    #[error("translation backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure while resolving a message template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The request's cancellation token fired before the lookup finished.
    #[error("template lookup for {code} was cancelled")]
    Cancelled { code: ErrorCode },
    #[error(transparent)]
    Translation(#[from] TranslateError),
    /// Custom resolver failure.
    #[error("resolver failed for {code}: {reason}")]
    Backend { code: ErrorCode, reason: String },
}

/// A successful outcome was converted into a typed failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("only a failed outcome can be converted into a typed outcome")]
pub struct ConversionError;

/// Everything a builder can return besides an [`Outcome`](crate::Outcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl BuildError {
    /// Whether the builder stopped because the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Resolve(ResolveError::Cancelled { .. }))
    }

    /// The argument violation, if this is one.
    pub fn as_argument(&self) -> Option<&ArgumentError> {
        match self {
            Self::Argument(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_messages_name_the_argument() {
        assert_eq!(
            ArgumentError::Null { name: "entity" }.to_string(),
            "entity cannot be null"
        );
        assert_eq!(
            ArgumentError::Blank { name: "propertyName" }.to_string(),
            "propertyName cannot be empty or whitespace"
        );
        assert_eq!(ArgumentError::Blank { name: "message" }.name(), "message");

        let reserved = ArgumentError::Reserved {
            name: "extras",
            key: "traceId".into(),
        };
        assert_eq!(reserved.to_string(), "extras cannot use the reserved key 'traceId'");
        assert_eq!(reserved.name(), "extras");
    }

    #[test]
    fn cancellation_is_distinguishable() {
        let err = BuildError::from(ResolveError::Cancelled {
            code: ErrorCode::new(300),
        });
        assert!(err.is_cancelled());
        assert!(err.as_argument().is_none());

        let err = BuildError::from(ResolveError::from(TranslateError::Unavailable(
            "down".into(),
        )));
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "translation backend unavailable: down");
    }
}
