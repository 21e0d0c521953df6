//! Board loading.

use wip_board::TaskBoard;
use wip_core::error::WipError;
use wip_core::result::WipResult;
use wip_core::traits::Id;
use wip_gateway::PersistenceGateway;

/// Fetch a project's task estimates and partition them into a board.
///
/// Fails with [`WipError::Load`] when the gateway is unreachable; the caller
/// shows a loading-failure state and may retry. No partial board is ever
/// returned.
pub async fn load_board(
    gateway: &dyn PersistenceGateway,
    project_id: Id,
) -> WipResult<TaskBoard> {
    let tasks = gateway
        .fetch_task_estimates(project_id)
        .await
        .map_err(|e| WipError::load(e.to_string()))?;

    tracing::debug!(project_id, task_count = tasks.len(), "board loaded");
    Ok(TaskBoard::from_tasks(project_id, tasks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wip_gateway::memory::InMemoryGateway;
    use wip_models::{Project, TaskEstimate, TaskStatus};

    #[tokio::test]
    async fn test_load_partitions_by_status() {
        let gateway = InMemoryGateway::new();
        let project_id = gateway.insert_project(Project::new(
            "p", "P", "C", 100.0, 9_000.0, 15_000.0,
        ));
        let mut done = TaskEstimate::new(project_id, "Done", 10.0, 50.0);
        done.status = TaskStatus::Completed;
        let done_id = gateway.insert_task(done);
        let pending_id =
            gateway.insert_task(TaskEstimate::new(project_id, "Later", 20.0, 50.0));

        let board = load_board(&gateway, project_id).await.unwrap();
        assert_eq!(board.bucket_ids(TaskStatus::Completed), &[done_id]);
        assert_eq!(board.bucket_ids(TaskStatus::Pending), &[pending_id]);
        assert!(board.bucket_ids(TaskStatus::InProgress).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_load_error() {
        let gateway = InMemoryGateway::new();
        gateway.fail_next_fetch("timeout");

        let err = load_board(&gateway, 1).await.unwrap_err();
        assert!(matches!(err, WipError::Load { .. }));
    }
}
