//! # wip-engine
//!
//! The recalculation engine: a pure transform from a project and its task
//! estimates to the project's WIP figures. The engine holds no state and
//! performs no I/O; persistence and timestamp stamping belong to the
//! synchronization layer above it.

pub mod recalc;

pub use recalc::{recalculate, WipFigures};
