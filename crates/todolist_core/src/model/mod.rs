//! Domain model for tasks, scoring and the dashboard summary.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep presentation formatting (`Display`) next to the data it renders.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Scoring never produces negative points or a decreasing level.

pub mod score;
pub mod summary;
pub mod task;
