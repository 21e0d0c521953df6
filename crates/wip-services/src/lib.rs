//! # wip-services
//!
//! The orchestration layer of the WIP tracking engine:
//! - [`load_board`]: fetch a project's tasks and partition them
//! - [`BoardController`]: user-driven moves with optimistic-update
//!   semantics. Apply locally, confirm through the gateway, roll back the
//!   single tentative move on failure
//! - [`UpdateTaskActualsService`]: contract-validated direct entry of a
//!   task's actual figures
//! - [`refresh_snapshot`] / [`list_snapshots`]: WIP snapshot
//!   synchronization (wholesale overwrite, last-writer-wins)

pub mod actuals;
pub mod controller;
pub mod load;
pub mod sync;

pub use actuals::UpdateTaskActualsService;
pub use controller::{BoardController, MoveOutcome};
pub use load::load_board;
pub use sync::{list_snapshots, refresh_snapshot};
