//! WIP snapshot synchronization.

use chrono::Utc;
use wip_core::config::RecalcPolicy;
use wip_core::error::WipError;
use wip_core::result::WipResult;
use wip_core::traits::Id;
use wip_engine::recalculate;
use wip_gateway::PersistenceGateway;
use wip_models::WipSnapshot;

/// Recompute a project's WIP aggregate and overwrite its persisted snapshot.
///
/// The write is wholesale at project granularity: last writer wins, no
/// partial-field update. Fetch failures surface as [`WipError::Load`], the
/// write failure as [`WipError::Persistence`].
pub async fn refresh_snapshot(
    gateway: &dyn PersistenceGateway,
    project_id: Id,
    policy: &RecalcPolicy,
) -> WipResult<WipSnapshot> {
    let project = gateway
        .fetch_project(project_id)
        .await
        .map_err(|e| WipError::load(e.to_string()))?;
    let tasks = gateway
        .fetch_task_estimates(project_id)
        .await
        .map_err(|e| WipError::load(e.to_string()))?;

    let figures = recalculate(&project, &tasks, policy);
    let snapshot = figures.into_snapshot(project_id, Utc::now());

    gateway
        .write_wip_snapshot(&snapshot)
        .await
        .map_err(|e| WipError::persistence(e.to_string()))?;

    tracing::debug!(
        project_id,
        completion = snapshot.completion_percentage,
        "wip snapshot refreshed"
    );
    Ok(snapshot)
}

/// All live snapshots, for listing/selecting a project to inspect.
pub async fn list_snapshots(gateway: &dyn PersistenceGateway) -> WipResult<Vec<WipSnapshot>> {
    gateway
        .fetch_wip_snapshots()
        .await
        .map_err(|e| WipError::load(e.to_string()))
}
