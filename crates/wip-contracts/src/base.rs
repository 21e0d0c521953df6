//! Base contract trait.

use wip_core::error::ValidationErrors;

/// Result of contract validation.
pub type ValidationResult = Result<(), ValidationErrors>;

/// A validation contract over some input type.
pub trait Contract<T>: Send + Sync {
    /// Validate the input, collecting every violation rather than stopping
    /// at the first.
    fn validate(&self, input: &T) -> ValidationResult;
}
