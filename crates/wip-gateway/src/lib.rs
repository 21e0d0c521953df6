//! # wip-gateway
//!
//! The persistence gateway seam of the WIP tracking engine. The engine never
//! talks to storage directly; everything goes through the
//! [`PersistenceGateway`] trait, which is the single source of truth for
//! projects, task estimates, and WIP snapshots.
//!
//! Two implementations ship here:
//! - [`postgres::PgGateway`]: production storage over sqlx/PostgreSQL
//! - [`memory::InMemoryGateway`]: reference semantics and test fixture,
//!   with write-failure injection for exercising rollback paths

pub mod memory;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use wip_core::traits::Id;
use wip_models::{Project, TaskActualsInput, TaskEstimate, TaskStatus, WipSnapshot};

/// Error type for gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{entity} not found: id={id}")]
    NotFound { entity: &'static str, id: Id },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored data could not be decoded: {0}")]
    Decode(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Read/write access to the persisted entities the engine operates on.
///
/// Writes are whole-field: `update_task_status` replaces the status,
/// `write_wip_snapshot` overwrites the project's snapshot wholesale
/// (last-writer-wins at project granularity). No operation here is
/// transactional across entities; the service layer sequences calls and
/// reconciles failures.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// All task estimates belonging to a project, in stable id order.
    async fn fetch_task_estimates(&self, project_id: Id) -> GatewayResult<Vec<TaskEstimate>>;

    async fn fetch_project(&self, project_id: Id) -> GatewayResult<Project>;

    async fn update_task_status(&self, task_id: Id, new_status: TaskStatus) -> GatewayResult<()>;

    /// Merge the supplied actual figures into the task; absent fields are
    /// left untouched.
    async fn update_task_actuals(&self, task_id: Id, input: TaskActualsInput)
        -> GatewayResult<()>;

    /// Overwrite the project's live snapshot (insert if none exists yet).
    async fn write_wip_snapshot(&self, snapshot: &WipSnapshot) -> GatewayResult<()>;

    /// All live snapshots, for listing/selecting a project to inspect.
    async fn fetch_wip_snapshots(&self) -> GatewayResult<Vec<WipSnapshot>>;
}
