//! Project model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use wip_core::traits::{Entity, Id, Identifiable, Timestamped};

/// A unit of billable work tracked against its original estimate.
///
/// Projects are created, and their estimate figures fixed, by an external
/// estimation workflow. This engine only reads them: every field here is an
/// input to recalculation, never an output.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    /// Unique identifier (URL-safe slug)
    #[validate(length(min = 1, max = 100))]
    pub identifier: String,

    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Client the work is billed to
    #[validate(length(min = 1, max = 255))]
    pub client_name: String,

    /// Total estimated hours across the project
    #[validate(range(min = 0.0))]
    pub estimated_hours: f64,

    /// Estimated internal labor cost
    #[validate(range(min = 0.0))]
    pub estimated_labor_cost: f64,

    /// Estimated amount billable to the client
    #[validate(range(min = 0.0))]
    pub estimated_billable_amount: f64,

    /// Estimated margin; equals billable minus labor cost at creation
    pub estimated_gross_margin: f64,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    /// Create a project with its estimate figures.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        client_name: impl Into<String>,
        estimated_hours: f64,
        estimated_labor_cost: f64,
        estimated_billable_amount: f64,
    ) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            name: name.into(),
            client_name: client_name.into(),
            estimated_hours,
            estimated_labor_cost,
            estimated_billable_amount,
            estimated_gross_margin: estimated_billable_amount - estimated_labor_cost,
            created_at: None,
            updated_at: None,
        }
    }

    /// The project-level average billing rate used to price actual hours.
    ///
    /// `None` when the project has no estimated hours: with nothing estimated
    /// there is no defined rate, and downstream billable amounts fall back to
    /// zero rather than dividing by zero.
    pub fn blended_rate(&self) -> Option<f64> {
        if self.estimated_hours > 0.0 {
            Some(self.estimated_billable_amount / self.estimated_hours)
        } else {
            None
        }
    }

    /// Whether the stored margin matches billable minus labor cost.
    pub fn margin_consistent(&self, tolerance: f64) -> bool {
        let expected = self.estimated_billable_amount - self.estimated_labor_cost;
        (self.estimated_gross_margin - expected).abs() <= tolerance
    }
}
