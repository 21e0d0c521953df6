//! # wip-board
//!
//! The in-memory task board: one project's task estimates partitioned into
//! `pending` / `in_progress` / `completed` buckets that mirror each task's
//! status field.
//!
//! Mutation follows a two-phase protocol: [`TaskBoard::begin_move`] applies a
//! move optimistically and returns a [`PendingMove`] receipt recording the
//! inverse; the caller either [`TaskBoard::commit_move`]s it once the store
//! confirms, or [`TaskBoard::roll_back`]s exactly that one tentative move,
//! restoring the last store-confirmed state without reloading the board.

pub mod board;

pub use board::{MoveCommand, PendingMove, TaskBoard};
