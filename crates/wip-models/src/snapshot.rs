//! WIP snapshot model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wip_core::traits::{Id, ProjectScoped};

/// The derived financial-progress aggregate for one project.
///
/// One live snapshot exists per project and recalculation overwrites it
/// wholesale; there is no append history and no partial-field update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WipSnapshot {
    pub project_id: Id,

    /// Hours counted as worked (completed actuals plus the in-progress share)
    pub actual_hours_worked: f64,

    /// Labor cost counted as incurred
    pub actual_labor_cost: f64,

    /// Actual hours priced at the project's blended rate
    pub actual_billable_amount: f64,

    /// Billable amount minus labor cost
    pub actual_gross_margin: f64,

    /// Actual-to-estimated hours ratio, clamped to 0..=100
    pub completion_percentage: f64,

    pub updated_at: DateTime<Utc>,
}

impl ProjectScoped for WipSnapshot {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl WipSnapshot {
    /// Whether the snapshot satisfies its own arithmetic invariants.
    pub fn invariants_hold(&self, tolerance: f64) -> bool {
        let margin_ok = (self.actual_gross_margin
            - (self.actual_billable_amount - self.actual_labor_cost))
            .abs()
            <= tolerance;
        let pct_ok = (0.0..=100.0).contains(&self.completion_percentage);
        margin_ok && pct_ok
    }
}
