//! Task board model.

use std::collections::HashMap;

use wip_core::error::WipError;
use wip_core::result::WipResult;
use wip_core::traits::Id;
use wip_models::{TaskEstimate, TaskStatus};

/// A user-initiated move of one task between board positions.
///
/// The source bucket and index are a correctness precondition: they must
/// match where the task actually is, or the caller's view of the board has
/// drifted from the board it is mutating. The destination index is display
/// ordering only and is clamped to the destination bucket's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub task_id: Id,
    pub source: TaskStatus,
    pub source_index: usize,
    pub destination: TaskStatus,
    pub destination_index: usize,
}

impl MoveCommand {
    pub fn new(
        task_id: Id,
        source: TaskStatus,
        source_index: usize,
        destination: TaskStatus,
        destination_index: usize,
    ) -> Self {
        Self {
            task_id,
            source,
            source_index,
            destination,
            destination_index,
        }
    }

    /// Whether this command would leave the board unchanged.
    pub fn is_noop(&self) -> bool {
        self.source == self.destination && self.source_index == self.destination_index
    }
}

/// Receipt for a tentatively applied move.
///
/// Records where the task came from so the exact inverse can be applied if
/// the store rejects the mutation. Holding a receipt means the board is
/// showing state the store has not yet confirmed.
#[derive(Debug, Clone, Copy)]
#[must_use = "a pending move must be committed or rolled back"]
pub struct PendingMove {
    pub task_id: Id,
    pub source: TaskStatus,
    pub source_index: usize,
    pub destination: TaskStatus,
    /// Index the task actually landed at (after clamping).
    pub destination_index: usize,
    /// True when the command matched its own source position exactly and
    /// nothing changed.
    pub noop: bool,
}

impl PendingMove {
    /// Whether the move changed the task's status (bucket), as opposed to
    /// only its display position within a bucket.
    pub fn changes_status(&self) -> bool {
        self.source != self.destination
    }
}

/// One project's task estimates, partitioned into status buckets.
///
/// The board owns the tasks (arena keyed by task id) and keeps three ordered
/// id vectors, one per status. Bucket membership always mirrors each task's
/// `status` field; ordering within a bucket is display-only.
#[derive(Debug, Clone)]
pub struct TaskBoard {
    project_id: Id,
    tasks: HashMap<Id, TaskEstimate>,
    buckets: [Vec<Id>; 3],
}

impl TaskBoard {
    /// Build a board from a project's task estimates, partitioning by
    /// status. Input order is preserved within each bucket. Tasks without an
    /// id cannot sit on a board and are skipped.
    pub fn from_tasks(project_id: Id, tasks: Vec<TaskEstimate>) -> Self {
        let mut board = Self {
            project_id,
            tasks: HashMap::new(),
            buckets: [Vec::new(), Vec::new(), Vec::new()],
        };

        for task in tasks {
            let Some(id) = task.id else {
                tracing::warn!(project_id, "skipping task without id during partition");
                continue;
            };
            board.buckets[task.status.position()].push(id);
            board.tasks.insert(id, task);
        }

        board
    }

    pub fn project_id(&self) -> Id {
        self.project_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, task_id: Id) -> Option<&TaskEstimate> {
        self.tasks.get(&task_id)
    }

    /// Ordered task ids in one bucket.
    pub fn bucket_ids(&self, status: TaskStatus) -> &[Id] {
        &self.buckets[status.position()]
    }

    /// Tasks in one bucket, in display order.
    pub fn tasks_in(&self, status: TaskStatus) -> Vec<&TaskEstimate> {
        self.buckets[status.position()]
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .collect()
    }

    /// All tasks on the board, in no particular order.
    pub fn tasks(&self) -> impl Iterator<Item = &TaskEstimate> {
        self.tasks.values()
    }

    /// Apply a move and finalize it immediately.
    ///
    /// Equivalent to `begin_move` followed by `commit_move`; callers that
    /// need to reconcile with a store keep the two phases separate.
    pub fn move_task(&mut self, cmd: MoveCommand) -> WipResult<PendingMove> {
        let pending = self.begin_move(cmd)?;
        Ok(self.commit_move(pending))
    }

    /// Tentatively apply a move, returning a receipt recording the inverse.
    ///
    /// The task is removed from the source bucket at the stated index,
    /// its status set to the destination bucket's status, and inserted at
    /// the (clamped) destination index. A command whose source position does
    /// not match the board is an invariant violation, not a user error.
    pub fn begin_move(&mut self, cmd: MoveCommand) -> WipResult<PendingMove> {
        self.check_source(&cmd)?;

        if cmd.is_noop() {
            return Ok(PendingMove {
                task_id: cmd.task_id,
                source: cmd.source,
                source_index: cmd.source_index,
                destination: cmd.destination,
                destination_index: cmd.destination_index,
                noop: true,
            });
        }

        self.buckets[cmd.source.position()].remove(cmd.source_index);

        let destination_bucket = &mut self.buckets[cmd.destination.position()];
        let insert_at = cmd.destination_index.min(destination_bucket.len());
        destination_bucket.insert(insert_at, cmd.task_id);

        if let Some(task) = self.tasks.get_mut(&cmd.task_id) {
            task.status = cmd.destination;
        }

        tracing::debug!(
            task_id = cmd.task_id,
            from = %cmd.source,
            to = %cmd.destination,
            "move applied tentatively"
        );

        Ok(PendingMove {
            task_id: cmd.task_id,
            source: cmd.source,
            source_index: cmd.source_index,
            destination: cmd.destination,
            destination_index: insert_at,
            noop: false,
        })
    }

    /// Finalize a tentative move. The receipt is consumed; there is nothing
    /// left to undo.
    pub fn commit_move(&mut self, pending: PendingMove) -> PendingMove {
        if !pending.noop {
            tracing::debug!(task_id = pending.task_id, "move committed");
        }
        pending
    }

    /// Undo exactly one tentative move, restoring the task's previous bucket,
    /// position, and status. Only the affected task is touched; the rest of
    /// the board keeps any state it already had.
    pub fn roll_back(&mut self, pending: PendingMove) -> WipResult<()> {
        if pending.noop {
            return Ok(());
        }

        let destination_bucket = &mut self.buckets[pending.destination.position()];
        let current_index = destination_bucket
            .iter()
            .position(|&id| id == pending.task_id)
            .ok_or_else(|| {
                WipError::invariant(format!(
                    "cannot roll back task {}: not present in {} bucket",
                    pending.task_id, pending.destination
                ))
            })?;
        destination_bucket.remove(current_index);

        let source_bucket = &mut self.buckets[pending.source.position()];
        let insert_at = pending.source_index.min(source_bucket.len());
        source_bucket.insert(insert_at, pending.task_id);

        if let Some(task) = self.tasks.get_mut(&pending.task_id) {
            task.status = pending.source;
        }

        tracing::warn!(
            task_id = pending.task_id,
            restored_to = %pending.source,
            "tentative move rolled back"
        );
        Ok(())
    }

    fn check_source(&self, cmd: &MoveCommand) -> WipResult<()> {
        let bucket = self.bucket_ids(cmd.source);
        let at_index = bucket.get(cmd.source_index).copied();

        debug_assert_eq!(
            at_index,
            Some(cmd.task_id),
            "move command out of sync with board"
        );

        match at_index {
            Some(id) if id == cmd.task_id => Ok(()),
            Some(other) => Err(WipError::invariant(format!(
                "task {} expected at {}[{}], found task {}",
                cmd.task_id, cmd.source, cmd.source_index, other
            ))),
            None => Err(WipError::invariant(format!(
                "task {} expected at {}[{}], bucket has {} entries",
                cmd.task_id,
                cmd.source,
                cmd.source_index,
                bucket.len()
            ))),
        }
    }
}
