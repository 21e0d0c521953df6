//! Task estimate model and the actuals-entry write DTO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use wip_core::traits::{Entity, Id, Identifiable, ProjectScoped, Timestamped};

use crate::status::TaskStatus;

/// One planned unit of work within a project.
///
/// Created when a project's estimate is decomposed into tasks (outside this
/// engine). The engine mutates exactly two things afterwards: the status,
/// through the board's move protocol, and the recorded actuals, through the
/// actuals-entry service. Tasks are never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskEstimate {
    pub id: Option<Id>,

    /// Owning project
    pub project_id: Id,

    /// Task name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Planned hours for this task
    #[validate(range(min = 0.0))]
    pub estimated_hours: f64,

    /// Rate the task's hours are costed at
    #[validate(range(min = 0.0))]
    pub hourly_rate: f64,

    /// Planned cost; equals estimated_hours x hourly_rate at creation
    #[validate(range(min = 0.0))]
    pub estimated_cost: f64,

    /// Hours actually worked, when recorded
    pub actual_hours: Option<f64>,

    /// Cost actually incurred, when recorded. Usually consistent with
    /// actual_hours x hourly_rate but direct entry may override it.
    pub actual_cost: Option<f64>,

    /// Worker the task is assigned to, if any
    pub assigned_to_id: Option<Id>,

    pub status: TaskStatus,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for TaskEstimate {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for TaskEstimate {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl ProjectScoped for TaskEstimate {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for TaskEstimate {
    const TABLE_NAME: &'static str = "task_estimates";
    const TYPE_NAME: &'static str = "TaskEstimate";
}

impl TaskEstimate {
    /// Create a new pending task with its estimate figures.
    pub fn new(
        project_id: Id,
        name: impl Into<String>,
        estimated_hours: f64,
        hourly_rate: f64,
    ) -> Self {
        Self {
            id: None,
            project_id,
            name: name.into(),
            estimated_hours,
            hourly_rate,
            estimated_cost: estimated_hours * hourly_rate,
            actual_hours: None,
            actual_cost: None,
            assigned_to_id: None,
            status: TaskStatus::Pending,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether any actual figure has been recorded for this task.
    pub fn has_recorded_actuals(&self) -> bool {
        self.actual_hours.is_some() || self.actual_cost.is_some()
    }

    /// Apply an actuals entry. Validation happens at the service boundary;
    /// this only merges the supplied fields.
    pub fn apply_actuals(&mut self, input: &TaskActualsInput) {
        if let Some(hours) = input.actual_hours {
            self.actual_hours = Some(hours);
        }
        if let Some(cost) = input.actual_cost {
            self.actual_cost = Some(cost);
        }
    }
}

/// Direct numeric entry of a task's actual figures.
///
/// Either field may be supplied alone; an entry with neither is rejected by
/// the actuals contract.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActualsInput {
    pub actual_hours: Option<f64>,
    pub actual_cost: Option<f64>,
}

impl TaskActualsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.actual_hours = Some(hours);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.actual_cost = Some(cost);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.actual_hours.is_none() && self.actual_cost.is_none()
    }
}
