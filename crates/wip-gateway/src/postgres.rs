//! PostgreSQL gateway implementation.
//!
//! Tables: `projects`, `task_estimates`, `wip_snapshots`. Statuses are stored
//! as text and parsed on read; a row carrying an unknown status is reported
//! as a decode failure rather than silently dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use wip_core::traits::Id;
use wip_models::{Project, TaskActualsInput, TaskEstimate, TaskStatus, WipSnapshot};

use crate::pool::Database;
use crate::{GatewayError, GatewayResult, PersistenceGateway};

/// Task estimate database row.
#[derive(Debug, Clone, FromRow)]
struct TaskEstimateRow {
    id: i64,
    project_id: i64,
    name: String,
    estimated_hours: f64,
    hourly_rate: f64,
    estimated_cost: f64,
    actual_hours: Option<f64>,
    actual_cost: Option<f64>,
    assigned_to_id: Option<i64>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskEstimateRow> for TaskEstimate {
    type Error = GatewayError;

    fn try_from(row: TaskEstimateRow) -> Result<Self, Self::Error> {
        let status: TaskStatus = row
            .status
            .parse()
            .map_err(|e| GatewayError::Decode(format!("task {}: {}", row.id, e)))?;

        Ok(TaskEstimate {
            id: Some(row.id),
            project_id: row.project_id,
            name: row.name,
            estimated_hours: row.estimated_hours,
            hourly_rate: row.hourly_rate,
            estimated_cost: row.estimated_cost,
            actual_hours: row.actual_hours,
            actual_cost: row.actual_cost,
            assigned_to_id: row.assigned_to_id,
            status,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

/// Project database row.
#[derive(Debug, Clone, FromRow)]
struct ProjectRow {
    id: i64,
    identifier: String,
    name: String,
    client_name: String,
    estimated_hours: f64,
    estimated_labor_cost: f64,
    estimated_billable_amount: f64,
    estimated_gross_margin: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: Some(row.id),
            identifier: row.identifier,
            name: row.name,
            client_name: row.client_name,
            estimated_hours: row.estimated_hours,
            estimated_labor_cost: row.estimated_labor_cost,
            estimated_billable_amount: row.estimated_billable_amount,
            estimated_gross_margin: row.estimated_gross_margin,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// WIP snapshot database row.
#[derive(Debug, Clone, FromRow)]
struct WipSnapshotRow {
    project_id: i64,
    actual_hours_worked: f64,
    actual_labor_cost: f64,
    actual_billable_amount: f64,
    actual_gross_margin: f64,
    completion_percentage: f64,
    updated_at: DateTime<Utc>,
}

impl From<WipSnapshotRow> for WipSnapshot {
    fn from(row: WipSnapshotRow) -> Self {
        WipSnapshot {
            project_id: row.project_id,
            actual_hours_worked: row.actual_hours_worked,
            actual_labor_cost: row.actual_labor_cost,
            actual_billable_amount: row.actual_billable_amount,
            actual_gross_margin: row.actual_gross_margin,
            completion_percentage: row.completion_percentage,
            updated_at: row.updated_at,
        }
    }
}

/// Gateway backed by PostgreSQL.
#[derive(Clone)]
pub struct PgGateway {
    db: Database,
}

impl PgGateway {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn fetch_task_estimates(&self, project_id: Id) -> GatewayResult<Vec<TaskEstimate>> {
        let rows = sqlx::query_as::<_, TaskEstimateRow>(
            r#"
            SELECT id, project_id, name, estimated_hours, hourly_rate,
                   estimated_cost, actual_hours, actual_cost, assigned_to_id,
                   status, created_at, updated_at
            FROM task_estimates
            WHERE project_id = $1
            ORDER BY id
            "#,
        )
        .bind(project_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(TaskEstimate::try_from).collect()
    }

    async fn fetch_project(&self, project_id: Id) -> GatewayResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, identifier, name, client_name, estimated_hours,
                   estimated_labor_cost, estimated_billable_amount,
                   estimated_gross_margin, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(GatewayError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

        Ok(row.into())
    }

    async fn update_task_status(&self, task_id: Id, new_status: TaskStatus) -> GatewayResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE task_estimates
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(task_id)
        .bind(new_status.as_str())
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound {
                entity: "TaskEstimate",
                id: task_id,
            });
        }

        tracing::debug!(task_id, status = %new_status, "task status persisted");
        Ok(())
    }

    async fn update_task_actuals(
        &self,
        task_id: Id,
        input: TaskActualsInput,
    ) -> GatewayResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE task_estimates
            SET actual_hours = COALESCE($2, actual_hours),
                actual_cost = COALESCE($3, actual_cost),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(task_id)
        .bind(input.actual_hours)
        .bind(input.actual_cost)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound {
                entity: "TaskEstimate",
                id: task_id,
            });
        }

        Ok(())
    }

    async fn write_wip_snapshot(&self, snapshot: &WipSnapshot) -> GatewayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO wip_snapshots (
                project_id, actual_hours_worked, actual_labor_cost,
                actual_billable_amount, actual_gross_margin,
                completion_percentage, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (project_id) DO UPDATE SET
                actual_hours_worked = EXCLUDED.actual_hours_worked,
                actual_labor_cost = EXCLUDED.actual_labor_cost,
                actual_billable_amount = EXCLUDED.actual_billable_amount,
                actual_gross_margin = EXCLUDED.actual_gross_margin,
                completion_percentage = EXCLUDED.completion_percentage,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(snapshot.project_id)
        .bind(snapshot.actual_hours_worked)
        .bind(snapshot.actual_labor_cost)
        .bind(snapshot.actual_billable_amount)
        .bind(snapshot.actual_gross_margin)
        .bind(snapshot.completion_percentage)
        .bind(snapshot.updated_at)
        .execute(self.db.pool())
        .await?;

        tracing::debug!(project_id = snapshot.project_id, "wip snapshot written");
        Ok(())
    }

    async fn fetch_wip_snapshots(&self) -> GatewayResult<Vec<WipSnapshot>> {
        let rows = sqlx::query_as::<_, WipSnapshotRow>(
            r#"
            SELECT project_id, actual_hours_worked, actual_labor_cost,
                   actual_billable_amount, actual_gross_margin,
                   completion_percentage, updated_at
            FROM wip_snapshots
            ORDER BY project_id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(WipSnapshot::from).collect())
    }
}
