//! Error types for the WIP tracking engine.
//!
//! The taxonomy distinguishes failures a caller can recover from (load and
//! persistence failures, validation rejections) from programmer errors
//! (invariant violations), which fail loudly instead of being corrected.

use std::collections::HashMap;
use thiserror::Error;

/// Engine-wide error type.
#[derive(Error, Debug)]
pub enum WipError {
    /// Fetching board data for a project failed. Recoverable by retry; the
    /// caller shows an empty/error state and never partial data.
    #[error("failed to load board data: {message}")]
    Load { message: String },

    /// A move referenced a task not present at the stated bucket/index.
    /// Programmer error: the caller's view of the board is out of sync with
    /// the board it is mutating.
    #[error("board invariant violated: {message}")]
    InvariantViolation { message: String },

    /// A gateway write did not complete. The tentative mutation has already
    /// been rolled back when this surfaces; the caller notifies the user that
    /// the action did not persist.
    #[error("persistence failed: {message}")]
    Persistence { message: String },

    /// Input rejected at a mutation boundary before it could reach the
    /// recalculation engine.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl WipError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, for callers that log or classify.
    pub fn error_code(&self) -> &'static str {
        match self {
            WipError::Load { .. } => "load_failed",
            WipError::InvariantViolation { .. } => "invariant_violation",
            WipError::Persistence { .. } => "persistence_failed",
            WipError::Validation(_) => "validation_failed",
        }
    }

    /// Whether retrying the same operation can succeed without code changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WipError::Load { .. } | WipError::Persistence { .. })
    }
}

/// Field-keyed validation error collection.
#[derive(Error, Debug, Default, Clone)]
#[error("validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field name -> messages
    pub errors: HashMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}
