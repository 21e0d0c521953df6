//! Status transition controller.

use std::sync::Arc;

use wip_board::{MoveCommand, TaskBoard};
use wip_core::config::RecalcPolicy;
use wip_core::error::WipError;
use wip_core::result::WipResult;
use wip_core::traits::Id;
use wip_gateway::PersistenceGateway;
use wip_models::{TaskStatus, WipSnapshot};

use crate::load::load_board;
use crate::sync::refresh_snapshot;

/// What an applied move settled to.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub task_id: Id,
    pub previous_status: TaskStatus,
    pub new_status: TaskStatus,
    /// The command matched its own source position; nothing changed.
    pub noop: bool,
    /// Refreshed aggregate, present when the move changed the task's status
    /// and the snapshot write succeeded.
    pub snapshot: Option<WipSnapshot>,
}

/// Orchestrates user-driven moves end-to-end with optimistic-update
/// semantics.
///
/// After any `apply_move` the visible board has settled to one of exactly
/// two states: the new state confirmed by the gateway (with a refreshed WIP
/// snapshot), or the last gateway-confirmed state, restored by rolling back
/// the single tentative move. The board never shows a mutation as committed
/// when the gateway has not confirmed it.
pub struct BoardController {
    gateway: Arc<dyn PersistenceGateway>,
    policy: RecalcPolicy,
}

impl BoardController {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, policy: RecalcPolicy) -> Self {
        Self { gateway, policy }
    }

    pub fn policy(&self) -> &RecalcPolicy {
        &self.policy
    }

    /// Load (or reload) a project's board from the gateway. This is also the
    /// coarse recovery path when a caller prefers a fresh authoritative
    /// state over the targeted rollback `apply_move` already performed.
    pub async fn load_board(&self, project_id: Id) -> WipResult<TaskBoard> {
        load_board(self.gateway.as_ref(), project_id).await
    }

    /// Apply one user-driven move.
    ///
    /// The move is applied to the board immediately (visible before
    /// persistence confirms), then the status change is sent to the gateway:
    ///
    /// - gateway confirms: the move is committed and the project's WIP
    ///   snapshot refreshed;
    /// - gateway fails: the tentative move is rolled back and
    ///   [`WipError::Persistence`] surfaces for user notification.
    ///
    /// Reorders within a bucket change display ordering only; no status is
    /// persisted and no recalculation runs for them. If the snapshot refresh
    /// fails after the status update was confirmed, the board keeps the
    /// confirmed move and the error surfaces so the caller knows the summary
    /// view is stale.
    pub async fn apply_move(
        &self,
        board: &mut TaskBoard,
        cmd: MoveCommand,
    ) -> WipResult<MoveOutcome> {
        let pending = board.begin_move(cmd)?;

        if pending.noop {
            return Ok(MoveOutcome {
                task_id: pending.task_id,
                previous_status: pending.source,
                new_status: pending.destination,
                noop: true,
                snapshot: None,
            });
        }

        if !pending.changes_status() {
            board.commit_move(pending);
            return Ok(MoveOutcome {
                task_id: pending.task_id,
                previous_status: pending.source,
                new_status: pending.destination,
                noop: false,
                snapshot: None,
            });
        }

        match self
            .gateway
            .update_task_status(pending.task_id, pending.destination)
            .await
        {
            Ok(()) => {
                board.commit_move(pending);
                tracing::info!(
                    task_id = pending.task_id,
                    from = %pending.source,
                    to = %pending.destination,
                    "status transition confirmed"
                );

                let snapshot =
                    refresh_snapshot(self.gateway.as_ref(), board.project_id(), &self.policy)
                        .await?;

                Ok(MoveOutcome {
                    task_id: pending.task_id,
                    previous_status: pending.source,
                    new_status: pending.destination,
                    noop: false,
                    snapshot: Some(snapshot),
                })
            }
            Err(err) => {
                tracing::warn!(
                    task_id = pending.task_id,
                    error = %err,
                    "status update rejected by gateway, rolling back"
                );
                board.roll_back(pending)?;
                Err(WipError::persistence(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wip_gateway::memory::InMemoryGateway;
    use wip_models::{Project, TaskActualsInput, TaskEstimate};

    struct Fixture {
        gateway: Arc<InMemoryGateway>,
        controller: BoardController,
        project_id: Id,
        t1: Id,
        t2: Id,
        t3: Id,
    }

    /// The worked estimate board: T1 completed with actuals, T2 and T3 still
    /// pending.
    fn fixture() -> Fixture {
        let gateway = Arc::new(InMemoryGateway::new());
        let project_id = gateway.insert_project(Project::new(
            "p1", "P1", "Client", 100.0, 9_000.0, 15_000.0,
        ));

        let mut t1 = TaskEstimate::new(project_id, "T1", 20.0, 50.0);
        t1.status = TaskStatus::Completed;
        t1.apply_actuals(&TaskActualsInput::new().with_hours(20.0).with_cost(1_000.0));
        let t1 = gateway.insert_task(t1);

        let t2 = gateway.insert_task(TaskEstimate::new(project_id, "T2", 30.0, 50.0));
        let t3 = gateway.insert_task(TaskEstimate::new(project_id, "T3", 50.0, 50.0));

        let controller =
            BoardController::new(gateway.clone(), RecalcPolicy::default());

        Fixture {
            gateway,
            controller,
            project_id,
            t1,
            t2,
            t3,
        }
    }

    #[tokio::test]
    async fn test_confirmed_move_persists_and_refreshes_snapshot() {
        let f = fixture();
        let mut board = f.controller.load_board(f.project_id).await.unwrap();

        let outcome = f
            .controller
            .apply_move(
                &mut board,
                MoveCommand::new(f.t2, TaskStatus::Pending, 0, TaskStatus::InProgress, 0),
            )
            .await
            .unwrap();

        // board, store, and aggregate all agree on the new state
        assert_eq!(board.task(f.t2).unwrap().status, TaskStatus::InProgress);
        assert_eq!(
            f.gateway.task(f.t2).unwrap().status,
            TaskStatus::InProgress
        );

        let snapshot = outcome.snapshot.expect("snapshot refreshed");
        assert!((snapshot.actual_hours_worked - 35.0).abs() < 1e-9);
        assert!((snapshot.actual_labor_cost - 1_750.0).abs() < 1e-9);
        assert!((snapshot.completion_percentage - 35.0).abs() < 1e-9);
        assert!((snapshot.actual_billable_amount - 5_250.0).abs() < 1e-9);
        assert!((snapshot.actual_gross_margin - 3_500.0).abs() < 1e-9);
        assert_eq!(f.gateway.snapshot(f.project_id), Some(snapshot));
    }

    #[tokio::test]
    async fn test_failed_move_rolls_back_to_gateway_state() {
        let f = fixture();
        let mut board = f.controller.load_board(f.project_id).await.unwrap();
        f.gateway.fail_next_write("connection reset");

        let err = f
            .controller
            .apply_move(
                &mut board,
                MoveCommand::new(f.t2, TaskStatus::Pending, 0, TaskStatus::Completed, 0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WipError::Persistence { .. }));

        // the board equals the pre-move state...
        assert_eq!(board.task(f.t2).unwrap().status, TaskStatus::Pending);
        assert_eq!(board.bucket_ids(TaskStatus::Pending), &[f.t2, f.t3]);
        assert_eq!(board.bucket_ids(TaskStatus::Completed), &[f.t1]);

        // ...which is exactly what a fresh load from the gateway shows
        let reloaded = f.controller.load_board(f.project_id).await.unwrap();
        for status in TaskStatus::ALL {
            assert_eq!(board.bucket_ids(status), reloaded.bucket_ids(status));
        }

        // nothing was committed: no snapshot was ever written
        assert!(f.gateway.snapshot(f.project_id).is_none());
    }

    #[tokio::test]
    async fn test_noop_move_skips_gateway() {
        let f = fixture();
        let mut board = f.controller.load_board(f.project_id).await.unwrap();

        let outcome = f
            .controller
            .apply_move(
                &mut board,
                MoveCommand::new(f.t2, TaskStatus::Pending, 0, TaskStatus::Pending, 0),
            )
            .await
            .unwrap();

        assert!(outcome.noop);
        assert!(outcome.snapshot.is_none());
        assert!(f.gateway.snapshot(f.project_id).is_none());
    }

    #[tokio::test]
    async fn test_reorder_within_bucket_is_display_only() {
        let f = fixture();
        let mut board = f.controller.load_board(f.project_id).await.unwrap();

        let outcome = f
            .controller
            .apply_move(
                &mut board,
                MoveCommand::new(f.t2, TaskStatus::Pending, 0, TaskStatus::Pending, 1),
            )
            .await
            .unwrap();

        assert!(!outcome.noop);
        assert!(outcome.snapshot.is_none());
        assert_eq!(board.bucket_ids(TaskStatus::Pending), &[f.t3, f.t2]);
        // no recalculation ran for a pure reorder
        assert!(f.gateway.snapshot(f.project_id).is_none());
    }

    #[tokio::test]
    async fn test_backward_move_allowed() {
        let f = fixture();
        let mut board = f.controller.load_board(f.project_id).await.unwrap();

        let outcome = f
            .controller
            .apply_move(
                &mut board,
                MoveCommand::new(f.t1, TaskStatus::Completed, 0, TaskStatus::Pending, 0),
            )
            .await
            .unwrap();

        assert_eq!(outcome.previous_status, TaskStatus::Completed);
        assert_eq!(outcome.new_status, TaskStatus::Pending);
        assert_eq!(f.gateway.task(f.t1).unwrap().status, TaskStatus::Pending);

        // T1's actuals no longer count once it is out of completed
        let snapshot = outcome.snapshot.unwrap();
        assert_eq!(snapshot.actual_hours_worked, 0.0);
        assert_eq!(snapshot.completion_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_snapshot_write_failure_keeps_confirmed_move() {
        let f = fixture();
        let mut board = f.controller.load_board(f.project_id).await.unwrap();

        // the status update is the first write, the snapshot the second
        f.gateway.fail_nth_write(2, "disk full");

        let err = f
            .controller
            .apply_move(
                &mut board,
                MoveCommand::new(f.t2, TaskStatus::Pending, 0, TaskStatus::InProgress, 0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WipError::Persistence { .. }));

        // the gateway agreed to the status change, so the board keeps it;
        // only the aggregate view is stale
        assert_eq!(board.task(f.t2).unwrap().status, TaskStatus::InProgress);
        assert_eq!(
            f.gateway.task(f.t2).unwrap().status,
            TaskStatus::InProgress
        );
        assert!(f.gateway.snapshot(f.project_id).is_none());
    }
}
