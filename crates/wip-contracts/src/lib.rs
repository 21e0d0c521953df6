//! # wip-contracts
//!
//! Contract validation for mutations entering the WIP engine. Contracts sit
//! at the mutation boundary so malformed input (negative hours, entries
//! against a pending task) is rejected before it can reach the recalculation
//! engine and corrupt aggregate output.

pub mod actuals;
pub mod base;

pub use actuals::TaskActualsContract;
pub use base::{Contract, ValidationResult};
