//! Direct entry of task actuals.

use std::sync::Arc;

use wip_contracts::{Contract, TaskActualsContract};
use wip_core::config::RecalcPolicy;
use wip_core::result::ServiceResult;
use wip_gateway::PersistenceGateway;
use wip_models::{TaskActualsInput, TaskEstimate, WipSnapshot};

use crate::sync::refresh_snapshot;

/// Records a task's actual hours/cost from direct numeric entry.
///
/// Input is validated through [`TaskActualsContract`] before anything is
/// persisted, so malformed figures are rejected here rather than corrupting
/// the aggregate downstream. On success the owning project's snapshot is
/// refreshed and returned.
pub struct UpdateTaskActualsService {
    gateway: Arc<dyn PersistenceGateway>,
    policy: RecalcPolicy,
}

impl UpdateTaskActualsService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, policy: RecalcPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Validate and persist an actuals entry for the given task.
    pub async fn call(
        &self,
        task: &TaskEstimate,
        input: TaskActualsInput,
    ) -> ServiceResult<WipSnapshot> {
        let contract = TaskActualsContract::new(task);
        if let Err(errors) = contract.validate(&input) {
            return ServiceResult::failure(errors);
        }

        let Some(task_id) = task.id else {
            return ServiceResult::failure_with_base_error(
                "cannot record actuals for an unsaved task",
            );
        };

        if let Err(err) = self.gateway.update_task_actuals(task_id, input).await {
            return ServiceResult::failure_with_base_error(format!(
                "actuals entry did not persist: {err}"
            ));
        }

        tracing::info!(task_id, "task actuals recorded");

        match refresh_snapshot(self.gateway.as_ref(), task.project_id, &self.policy).await {
            Ok(snapshot) => ServiceResult::success(snapshot),
            Err(err) => ServiceResult::failure_with_base_error(format!(
                "actuals persisted but the WIP snapshot is stale: {err}"
            )),
        }
    }
}
