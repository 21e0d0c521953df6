//! # wip-core
//!
//! Core types, traits, and utilities for the WIP tracking engine.
//!
//! This crate provides the foundational building blocks used across all other
//! crates:
//! - The engine error taxonomy (`WipError`) and validation error collection
//! - Result type aliases and the service result pattern
//! - Core traits (`Entity`, `Identifiable`, `Timestamped`)
//! - Configuration types with environment loading

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use config::*;
pub use error::*;
pub use result::*;
pub use traits::*;
