//! In-memory gateway.
//!
//! Reference implementation of the gateway contract, used as the shared test
//! fixture across the workspace. Supports one-shot failure injection so
//! services can exercise their rollback and load-failure paths.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use wip_core::traits::Id;
use wip_models::{Project, TaskActualsInput, TaskEstimate, TaskStatus, WipSnapshot};

use crate::{GatewayError, GatewayResult, PersistenceGateway};

#[derive(Default)]
struct Store {
    projects: BTreeMap<Id, Project>,
    tasks: BTreeMap<Id, TaskEstimate>,
    snapshots: BTreeMap<Id, WipSnapshot>,
    next_id: Id,
    /// Countdown to an injected write failure: fails when it reaches 1.
    fail_write_in: Option<(u32, String)>,
    fail_next_fetch: Option<String>,
}

impl Store {
    fn allocate_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn take_write_failure(&mut self) -> Option<String> {
        match self.fail_write_in.take() {
            Some((1, message)) => Some(message),
            Some((n, message)) => {
                self.fail_write_in = Some((n - 1, message));
                None
            }
            None => None,
        }
    }

    fn take_fetch_failure(&mut self) -> Option<String> {
        self.fail_next_fetch.take()
    }
}

/// Gateway holding everything in process memory.
#[derive(Default)]
pub struct InMemoryGateway {
    store: RwLock<Store>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a project, assigning an id if it has none. Returns the id.
    pub fn insert_project(&self, mut project: Project) -> Id {
        let mut store = self.store.write();
        let id = project.id.unwrap_or_else(|| store.allocate_id());
        project.id = Some(id);
        store.projects.insert(id, project);
        id
    }

    /// Insert a task estimate, assigning an id if it has none. Returns the id.
    pub fn insert_task(&self, mut task: TaskEstimate) -> Id {
        let mut store = self.store.write();
        let id = task.id.unwrap_or_else(|| store.allocate_id());
        task.id = Some(id);
        store.tasks.insert(id, task);
        id
    }

    /// Make the next write operation fail with the given message.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        self.fail_nth_write(1, message);
    }

    /// Make the nth write operation from now fail (1 = the next one).
    /// Earlier writes succeed and consume the countdown.
    pub fn fail_nth_write(&self, n: u32, message: impl Into<String>) {
        self.store.write().fail_write_in = Some((n.max(1), message.into()));
    }

    /// Make the next fetch operation fail with the given message.
    pub fn fail_next_fetch(&self, message: impl Into<String>) {
        self.store.write().fail_next_fetch = Some(message.into());
    }

    /// Current stored state of a task, for assertions.
    pub fn task(&self, task_id: Id) -> Option<TaskEstimate> {
        self.store.read().tasks.get(&task_id).cloned()
    }

    /// Current stored snapshot of a project, for assertions.
    pub fn snapshot(&self, project_id: Id) -> Option<WipSnapshot> {
        self.store.read().snapshots.get(&project_id).cloned()
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn fetch_task_estimates(&self, project_id: Id) -> GatewayResult<Vec<TaskEstimate>> {
        let mut store = self.store.write();
        if let Some(message) = store.take_fetch_failure() {
            return Err(GatewayError::Unavailable(message));
        }
        Ok(store
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn fetch_project(&self, project_id: Id) -> GatewayResult<Project> {
        let mut store = self.store.write();
        if let Some(message) = store.take_fetch_failure() {
            return Err(GatewayError::Unavailable(message));
        }
        store
            .projects
            .get(&project_id)
            .cloned()
            .ok_or(GatewayError::NotFound {
                entity: "Project",
                id: project_id,
            })
    }

    async fn update_task_status(&self, task_id: Id, new_status: TaskStatus) -> GatewayResult<()> {
        let mut store = self.store.write();
        if let Some(message) = store.take_write_failure() {
            return Err(GatewayError::Unavailable(message));
        }
        let task = store
            .tasks
            .get_mut(&task_id)
            .ok_or(GatewayError::NotFound {
                entity: "TaskEstimate",
                id: task_id,
            })?;
        task.status = new_status;
        task.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn update_task_actuals(
        &self,
        task_id: Id,
        input: TaskActualsInput,
    ) -> GatewayResult<()> {
        let mut store = self.store.write();
        if let Some(message) = store.take_write_failure() {
            return Err(GatewayError::Unavailable(message));
        }
        let task = store
            .tasks
            .get_mut(&task_id)
            .ok_or(GatewayError::NotFound {
                entity: "TaskEstimate",
                id: task_id,
            })?;
        task.apply_actuals(&input);
        task.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn write_wip_snapshot(&self, snapshot: &WipSnapshot) -> GatewayResult<()> {
        let mut store = self.store.write();
        if let Some(message) = store.take_write_failure() {
            return Err(GatewayError::Unavailable(message));
        }
        store.snapshots.insert(snapshot.project_id, snapshot.clone());
        Ok(())
    }

    async fn fetch_wip_snapshots(&self) -> GatewayResult<Vec<WipSnapshot>> {
        let mut store = self.store.write();
        if let Some(message) = store.take_fetch_failure() {
            return Err(GatewayError::Unavailable(message));
        }
        Ok(store.snapshots.values().cloned().collect())
    }
}
