//! Validation failures produced by an external validator.
//!
//! The builders only count them and forward them verbatim into the
//! `errors` context field.

use serde::{Deserialize, Serialize};

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
    #[serde(default)]
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>, index: usize) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            index,
            code: None,
        }
    }

    /// Attach the validator's rule code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}
