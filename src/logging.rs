//! Structured log view of an [`ErrorValue`].
//!
//! [`ProblemLog`] borrows from the error that created it and cannot outlive
//! it. It writes a single line with bounded field lengths, so an oversized
//! payload in the context bag cannot flood a log sink:
//!
//! ```text
//! [E-PRB-300] type='https://…/resource-not-found' description='User with Id '1' was not found' traceId='t-1' entity='User'
//! ```
//!
//! The crate itself only hands these lines to `tracing`; where they end up
//! is up to the subscriber the application installs.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::{ErrorClassification, ErrorCode, ErrorValue};

/// Maximum length for any individual field in formatted output.
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings.
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Borrowed, structured view of one error.
#[derive(Debug, Clone, Copy)]
pub struct ProblemLog<'a> {
    error: &'a ErrorValue,
}

impl<'a> ProblemLog<'a> {
    #[inline]
    pub(crate) fn new(error: &'a ErrorValue) -> Self {
        Self { error }
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.error.code()
    }

    #[inline]
    pub fn classification(&self) -> &'a ErrorClassification {
        self.error.classification()
    }

    #[inline]
    pub fn description(&self) -> &'a str {
        self.error.description()
    }

    #[inline]
    pub fn trace_id(&self) -> Option<&'a str> {
        self.error.context().get_str(crate::keys::TRACE_ID)
    }

    /// Write the log line without allocating for short fields.
    ///
    /// The rendered `message` field is skipped because it repeats the
    /// description.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}] type='{}' description='{}'",
            self.error.code(),
            self.error.classification(),
            truncate_with_indicator(self.error.description())
        )?;

        for (key, value) in self.error.context().iter() {
            if key == crate::keys::MESSAGE || key == crate::keys::CODE {
                continue;
            }
            match value {
                None | Some(Value::Null) => write!(f, " {}=null", key)?,
                Some(Value::String(text)) => write!(f, " {}='{}'", key, truncate_with_indicator(text))?,
                Some(other) => {
                    let rendered = other.to_string();
                    write!(f, " {}={}", key, truncate_with_indicator(&rendered))?
                }
            }
        }

        Ok(())
    }

    /// Emit the line as a `tracing` debug event.
    pub fn emit(&self) {
        tracing::debug!(
            code = %self.code(),
            classification = %self.classification(),
            trace_id = self.trace_id().unwrap_or_default(),
            "{}",
            self
        );
    }
}

impl fmt::Display for ProblemLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Truncate a string for display, respecting UTF-8 boundaries.
///
/// Returns `Cow::Borrowed` when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
