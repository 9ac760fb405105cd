//! Error types for the domain layer
//!
//! `SelectionError` covers contract violations against a selection chain.
//! `DomainError` covers construction and validation failures of value objects.

use thiserror::Error;

use crate::aggregates::StageStatus;
use crate::ids::{OptionKey, StageId};

/// Contract violations surfaced to callers of a selection chain.
///
/// Provider failures are deliberately absent: they are recovered into the
/// `Failed` status of the affected stage and never cross the chain boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The key is not one of the stage's current options
    #[error("Invalid selection: '{key}' is not an option of stage '{stage}'")]
    InvalidSelection { stage: StageId, key: OptionKey },

    /// A snapshot was requested before every stage resolved
    #[error("Chain incomplete: stage '{stage}' is not resolved")]
    IncompleteChain { stage: StageId },

    /// The stage id is not part of this chain
    #[error("Unknown stage: {0}")]
    UnknownStage(StageId),

    /// The requested transition does not apply to the stage's current status
    #[error("Invalid transition for stage '{stage}' while {status}")]
    InvalidTransition { stage: StageId, status: StageStatus },
}

impl SelectionError {
    pub fn invalid_selection(stage: &StageId, key: &OptionKey) -> Self {
        Self::InvalidSelection {
            stage: stage.clone(),
            key: key.clone(),
        }
    }

    pub fn incomplete(stage: &StageId) -> Self {
        Self::IncompleteChain {
            stage: stage.clone(),
        }
    }

    pub fn invalid_transition(stage: &StageId, status: StageStatus) -> Self {
        Self::InvalidTransition {
            stage: stage.clone(),
            status,
        }
    }

    /// Check if this error means the chain has not finished resolving.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::IncompleteChain { .. })
    }
}

/// Unified error type for value object construction and validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl DomainError {
    /// Creates a validation error for malformed input.
    ///
    /// # Example
    /// ```ignore
    /// if email.trim().is_empty() {
    ///     return Err(DomainError::validation("email cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
                format!("{} ({})", field, codes.join(", "))
            })
            .collect();
        fields.sort();
        Self::Validation(format!("invalid fields: {}", fields.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_error_messages_name_stage_and_key() {
        let err = SelectionError::invalid_selection(&StageId::from("country"), &OptionKey::from("XX"));
        assert_eq!(
            err.to_string(),
            "Invalid selection: 'XX' is not an option of stage 'country'"
        );
    }

    #[test]
    fn incomplete_is_classified() {
        assert!(SelectionError::incomplete(&StageId::from("shipping")).is_incomplete());
        assert!(!SelectionError::UnknownStage(StageId::from("x")).is_incomplete());
    }
}
