//! WIP recalculation.

use chrono::{DateTime, Utc};
use wip_core::config::RecalcPolicy;
use wip_core::traits::Id;
use wip_models::{Project, TaskEstimate, TaskStatus, WipSnapshot};

/// The computed WIP aggregate for one project, before persistence stamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WipFigures {
    pub actual_hours_worked: f64,
    pub actual_labor_cost: f64,
    pub actual_billable_amount: f64,
    pub actual_gross_margin: f64,
    pub completion_percentage: f64,
}

impl WipFigures {
    /// Build the persisted snapshot form. The caller supplies the
    /// computation time so the transform itself stays pure.
    pub fn into_snapshot(self, project_id: Id, updated_at: DateTime<Utc>) -> WipSnapshot {
        WipSnapshot {
            project_id,
            actual_hours_worked: self.actual_hours_worked,
            actual_labor_cost: self.actual_labor_cost,
            actual_billable_amount: self.actual_billable_amount,
            actual_gross_margin: self.actual_gross_margin,
            completion_percentage: self.completion_percentage,
            updated_at,
        }
    }
}

/// Compute a project's WIP figures from its current task estimates.
///
/// - Completed tasks contribute their recorded actuals; a missing field
///   counts as zero.
/// - In-progress tasks contribute recorded actuals where present; an absent
///   field contributes the policy's completion share of the corresponding
///   estimate instead.
/// - Pending tasks contribute nothing to actuals but their estimated hours
///   count toward the completion denominator.
/// - Actual hours are billed at the project's blended rate. A project with
///   zero estimated hours has no defined rate, so the billable amount falls
///   back to zero instead of dividing by zero.
///
/// Inputs are assumed validated (non-negative, finite); the mutation
/// boundaries enforce that before anything reaches this function. Tasks
/// belonging to a different project are ignored.
pub fn recalculate(project: &Project, tasks: &[TaskEstimate], policy: &RecalcPolicy) -> WipFigures {
    let share = policy.in_progress_completion.clamp(0.0, 1.0);

    let mut actual_hours = 0.0;
    let mut actual_cost = 0.0;
    let mut estimated_hours_total = 0.0;

    for task in tasks {
        if let Some(project_id) = project.id {
            if task.project_id != project_id {
                continue;
            }
        }

        estimated_hours_total += task.estimated_hours;

        match task.status {
            TaskStatus::Completed => {
                actual_hours += task.actual_hours.unwrap_or(0.0);
                actual_cost += task.actual_cost.unwrap_or(0.0);
            }
            TaskStatus::InProgress => {
                actual_hours += task
                    .actual_hours
                    .unwrap_or(share * task.estimated_hours);
                actual_cost += task.actual_cost.unwrap_or(share * task.estimated_cost);
            }
            TaskStatus::Pending => {}
        }
    }

    let completion_percentage = if estimated_hours_total > 0.0 {
        (actual_hours / estimated_hours_total * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let actual_billable_amount = match project.blended_rate() {
        Some(rate) => actual_hours * rate,
        None => 0.0,
    };

    WipFigures {
        actual_hours_worked: actual_hours,
        actual_labor_cost: actual_cost,
        actual_billable_amount,
        actual_gross_margin: actual_billable_amount - actual_cost,
        completion_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wip_models::TaskActualsInput;

    fn project() -> Project {
        let mut p = Project::new("p1", "P1", "Client", 100.0, 9_000.0, 15_000.0);
        p.id = Some(1);
        p
    }

    fn task(id: Id, status: TaskStatus, estimated_hours: f64, hourly_rate: f64) -> TaskEstimate {
        let mut t = TaskEstimate::new(1, format!("task-{id}"), estimated_hours, hourly_rate);
        t.id = Some(id);
        t.status = status;
        t
    }

    /// T1 completed 20h/$1,000 actual, T2 in progress est 30h/$1,500, T3
    /// pending est 50h/$2,500: 35 hours worked, $1,750 cost, 35% complete,
    /// $5,250 billable at the $150 blended rate, $3,500 margin.
    #[test]
    fn test_worked_example() {
        let mut t1 = task(1, TaskStatus::Completed, 20.0, 50.0);
        t1.apply_actuals(&TaskActualsInput::new().with_hours(20.0).with_cost(1_000.0));
        let t2 = task(2, TaskStatus::InProgress, 30.0, 50.0);
        let t3 = task(3, TaskStatus::Pending, 50.0, 50.0);

        let figures = recalculate(&project(), &[t1, t2, t3], &RecalcPolicy::default());

        assert!((figures.actual_hours_worked - 35.0).abs() < 1e-9);
        assert!((figures.actual_labor_cost - 1_750.0).abs() < 1e-9);
        assert!((figures.completion_percentage - 35.0).abs() < 1e-9);
        assert!((figures.actual_billable_amount - 5_250.0).abs() < 1e-9);
        assert!((figures.actual_gross_margin - 3_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent() {
        let tasks = vec![
            task(1, TaskStatus::Completed, 20.0, 50.0),
            task(2, TaskStatus::InProgress, 30.0, 50.0),
        ];
        let policy = RecalcPolicy::default();
        let first = recalculate(&project(), &tasks, &policy);
        let second = recalculate(&project(), &tasks, &policy);
        assert_eq!(first, second);
    }

    #[test]
    fn test_completion_clamped_at_100() {
        // far more hours logged than estimated
        let mut t = task(1, TaskStatus::Completed, 10.0, 50.0);
        t.actual_hours = Some(500.0);
        let figures = recalculate(&project(), &[t], &RecalcPolicy::default());
        assert_eq!(figures.completion_percentage, 100.0);
    }

    #[test]
    fn test_empty_task_set() {
        let figures = recalculate(&project(), &[], &RecalcPolicy::default());
        assert_eq!(figures.actual_hours_worked, 0.0);
        assert_eq!(figures.completion_percentage, 0.0);
        assert_eq!(figures.actual_billable_amount, 0.0);
        assert_eq!(figures.actual_gross_margin, 0.0);
    }

    #[test]
    fn test_zero_estimate_guard() {
        let mut p = Project::new("p0", "P0", "Client", 0.0, 0.0, 5_000.0);
        p.id = Some(1);
        let mut t = task(1, TaskStatus::Completed, 0.0, 50.0);
        t.actual_hours = Some(40.0);
        t.actual_cost = Some(2_000.0);

        let figures = recalculate(&p, &[t], &RecalcPolicy::default());
        assert_eq!(figures.actual_billable_amount, 0.0);
        assert_eq!(figures.actual_gross_margin, -2_000.0);
        assert_eq!(figures.completion_percentage, 0.0);
    }

    #[test]
    fn test_completed_missing_actuals_count_as_zero() {
        let t = task(1, TaskStatus::Completed, 20.0, 50.0);
        let figures = recalculate(&project(), &[t], &RecalcPolicy::default());
        assert_eq!(figures.actual_hours_worked, 0.0);
        assert_eq!(figures.actual_labor_cost, 0.0);
    }

    #[test]
    fn test_in_progress_recorded_actuals_take_precedence() {
        let mut t = task(1, TaskStatus::InProgress, 30.0, 50.0);
        t.actual_hours = Some(22.0);
        t.actual_cost = Some(1_100.0);
        let figures = recalculate(&project(), &[t], &RecalcPolicy::default());
        assert_eq!(figures.actual_hours_worked, 22.0);
        assert_eq!(figures.actual_labor_cost, 1_100.0);
    }

    #[test]
    fn test_in_progress_partial_actuals_mix_per_field() {
        // recorded hours, unrecorded cost: heuristic fills only the cost
        let mut t = task(1, TaskStatus::InProgress, 30.0, 50.0);
        t.actual_hours = Some(22.0);
        let figures = recalculate(&project(), &[t], &RecalcPolicy::default());
        assert_eq!(figures.actual_hours_worked, 22.0);
        assert_eq!(figures.actual_labor_cost, 750.0);
    }

    #[test]
    fn test_policy_share_is_respected() {
        let t = task(1, TaskStatus::InProgress, 30.0, 50.0);
        let figures = recalculate(&project(), &[t.clone()], &RecalcPolicy::new(0.0));
        assert_eq!(figures.actual_hours_worked, 0.0);

        let figures = recalculate(&project(), &[t], &RecalcPolicy::new(1.0));
        assert_eq!(figures.actual_hours_worked, 30.0);
        assert_eq!(figures.actual_labor_cost, 1_500.0);
    }

    #[test]
    fn test_foreign_project_tasks_ignored() {
        let mut foreign = task(9, TaskStatus::Completed, 10.0, 50.0);
        foreign.project_id = 999;
        foreign.actual_hours = Some(10.0);
        foreign.actual_cost = Some(500.0);

        let figures = recalculate(&project(), &[foreign], &RecalcPolicy::default());
        assert_eq!(figures.actual_hours_worked, 0.0);
        assert_eq!(figures.completion_percentage, 0.0);
    }

    #[test]
    fn test_margin_identity() {
        let mut t1 = task(1, TaskStatus::Completed, 20.0, 50.0);
        t1.actual_hours = Some(17.3);
        t1.actual_cost = Some(912.57);
        let t2 = task(2, TaskStatus::InProgress, 33.7, 41.0);

        let figures = recalculate(&project(), &[t1, t2], &RecalcPolicy::default());
        let identity = figures.actual_billable_amount - figures.actual_labor_cost;
        assert!((figures.actual_gross_margin - identity).abs() <= 1e-6);
    }

    #[test]
    fn test_into_snapshot_carries_figures() {
        let t = task(1, TaskStatus::InProgress, 30.0, 50.0);
        let figures = recalculate(&project(), &[t], &RecalcPolicy::default());
        let at = Utc::now();
        let snapshot = figures.into_snapshot(1, at);

        assert_eq!(snapshot.project_id, 1);
        assert_eq!(snapshot.actual_hours_worked, figures.actual_hours_worked);
        assert_eq!(snapshot.updated_at, at);
        assert!(snapshot.invariants_hold(1e-6));
    }
}
