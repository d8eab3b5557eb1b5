//! Core domain logic for the to-do list.
//! This crate is the single source of truth for task and scoring invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::score::{ScoreRules, ScoreState, LEVEL_THRESHOLD, POINTS_PER_COMPLETION};
pub use model::summary::Summary;
pub use model::task::{
    NewTask, ParsePriorityError, Priority, Task, TaskId, TaskStatus, TaskValidationError,
};
pub use service::todo_service::{CompletionOutcome, TodoError, TodoList, TodoResult};
pub use store::{JsonTaskStore, MemoryTaskStore, StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
