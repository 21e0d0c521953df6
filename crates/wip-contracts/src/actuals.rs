//! Contract for direct entry of task actuals.

use wip_core::error::ValidationErrors;
use wip_models::{TaskActualsInput, TaskEstimate};

use crate::base::{Contract, ValidationResult};

/// Validates an actuals entry against the task it targets.
///
/// Rules:
/// - at least one of the two fields must be supplied;
/// - supplied values must be finite and non-negative;
/// - the task must be in a working status (`in_progress` or `completed`);
///   a pending task has no actuals to record.
pub struct TaskActualsContract<'a> {
    task: &'a TaskEstimate,
}

impl<'a> TaskActualsContract<'a> {
    pub fn new(task: &'a TaskEstimate) -> Self {
        Self { task }
    }

    fn check_amount(errors: &mut ValidationErrors, field: &str, value: Option<f64>) {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.add(field, "must be a finite number");
            } else if v < 0.0 {
                errors.add(field, "must be non-negative");
            }
        }
    }
}

impl Contract<TaskActualsInput> for TaskActualsContract<'_> {
    fn validate(&self, input: &TaskActualsInput) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if input.is_empty() {
            errors.add_base("at least one of actual_hours or actual_cost must be supplied");
        }

        Self::check_amount(&mut errors, "actual_hours", input.actual_hours);
        Self::check_amount(&mut errors, "actual_cost", input.actual_cost);

        if !self.task.status.accepts_actuals() {
            errors.add(
                "status",
                format!(
                    "task must be in progress or completed to record actuals (is {})",
                    self.task.status
                ),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
