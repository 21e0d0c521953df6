//! Result type aliases and the service result pattern.

use crate::error::{ValidationErrors, WipError};

/// Standard result type for engine operations.
pub type WipResult<T> = Result<T, WipError>;

/// Result of a validating service call.
///
/// Services that run contract validation return this instead of a bare
/// `Result` so callers get the full field-keyed error collection for user
/// display rather than a single flattened message.
#[derive(Debug)]
pub struct ServiceResult<T> {
    success: bool,
    result: Option<T>,
    errors: ValidationErrors,
    message: Option<String>,
}

impl<T> ServiceResult<T> {
    /// Create a successful service result.
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
            message: None,
        }
    }

    /// Create a failed service result.
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
            message: None,
        }
    }

    /// Create a failed service result with a single field error.
    pub fn failure_with_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::failure(errors)
    }

    /// Create a failed service result with a base error.
    pub fn failure_with_base_error(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        Self::failure(errors)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Get the result (if successful).
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take the result, consuming it.
    pub fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Map the result value if successful.
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
            message: self.message,
        }
    }

    /// Convert into a standard result, flattening validation errors.
    pub fn into_result(self) -> WipResult<T> {
        if self.success {
            self.result.ok_or_else(|| {
                WipError::persistence("service succeeded but returned no value")
            })
        } else {
            Err(WipError::Validation(self.errors))
        }
    }
}

impl<T> From<Result<T, ValidationErrors>> for ServiceResult<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(errors) => ServiceResult::failure(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result = ServiceResult::success(42);
        assert!(result.is_success());
        assert_eq!(result.result(), Some(&42));
    }

    #[test]
    fn test_failure_result() {
        let result: ServiceResult<i32> =
            ServiceResult::failure_with_error("actual_hours", "must be non-negative");
        assert!(result.is_failure());
        assert!(result.result().is_none());
        assert!(result.errors().has_error("actual_hours"));
    }

    #[test]
    fn test_map_preserves_failure() {
        let result: ServiceResult<i32> = ServiceResult::failure_with_base_error("no fields");
        let mapped = result.map(|n| n * 2);
        assert!(mapped.is_failure());
        assert!(mapped.result().is_none());
    }

    #[test]
    fn test_into_result_flattens_validation() {
        let result: ServiceResult<i32> =
            ServiceResult::failure_with_error("actual_cost", "must be finite");
        match result.into_result() {
            Err(WipError::Validation(errors)) => assert!(errors.has_error("actual_cost")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
