//! Selection option value object

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::OptionKey;

/// One choice offered by a stage: a stable key and a display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub key: OptionKey,
    pub label: String,
}

impl SelectionOption {
    pub fn new(key: impl Into<OptionKey>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Ensure keys are unique within one option list.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming the first repeated key.
pub fn ensure_unique_keys(options: &[SelectionOption]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(options.len());
    for option in options {
        if !seen.insert(option.key.as_str()) {
            return Err(DomainError::validation(format!(
                "duplicate option key '{}'",
                option.key
            )));
        }
    }
    Ok(())
}
