//! Task persistence contracts and implementations.
//!
//! # Responsibility
//! - Load and save the full task list as one unit.
//! - Load and save the score sidecar.
//! - Keep file format details out of the service layer.
//!
//! # Invariants
//! - A missing file reads as "nothing stored yet", never as an error.
//! - Malformed content is reported, not masked.
//! - Saves overwrite wholesale; there are no partial updates.

use crate::model::score::ScoreState;
use crate::model::task::Task;
use std::path::PathBuf;
use thiserror::Error;

mod json_file;
mod memory;

pub use json_file::JsonTaskStore;
pub use memory::MemoryTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for task and score files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{}`: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Injected by [`MemoryTaskStore::fail_saves`] and
    /// [`MemoryTaskStore::fail_score_saves`].
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage interface for the task list and score.
pub trait TaskStore {
    /// Returns all stored tasks in insertion order.
    fn load(&self) -> StoreResult<Vec<Task>>;
    /// Replaces the stored task list.
    fn save(&mut self, tasks: &[Task]) -> StoreResult<()>;
    /// Returns the stored score, or a fresh one when none exists.
    fn load_score(&self) -> StoreResult<ScoreState>;
    /// Replaces the stored score.
    fn save_score(&mut self, score: &ScoreState) -> StoreResult<()>;
}
