//! JSON file store.
//!
//! # Responsibility
//! - Read/write the tasks file as a 4-space indented JSON array.
//! - Read/write the score sidecar next to it.
//!
//! # Invariants
//! - Serialization is deterministic: saving an unchanged list rewrites
//!   identical bytes.
//! - Parent directories are created before writing.

use super::{StoreError, StoreResult, TaskStore};
use crate::model::score::ScoreState;
use crate::model::task::Task;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const INDENT: &[u8] = b"    ";

/// File-backed [`TaskStore`].
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    tasks_path: PathBuf,
    score_path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(tasks_path: impl Into<PathBuf>, score_path: impl Into<PathBuf>) -> Self {
        Self {
            tasks_path: tasks_path.into(),
            score_path: score_path.into(),
        }
    }

    /// Uses `tasks.json` and `score.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("tasks.json"), dir.join("score.json"))
    }

    pub fn tasks_path(&self) -> &Path {
        &self.tasks_path
    }

    pub fn score_path(&self) -> &Path {
        &self.score_path
    }
}

impl TaskStore for JsonTaskStore {
    fn load(&self) -> StoreResult<Vec<Task>> {
        let started_at = Instant::now();
        match read_json::<Vec<Task>>(&self.tasks_path) {
            Ok(Some(tasks)) => {
                info!(
                    "event=store_load module=store status=ok count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(tasks)
            }
            Ok(None) => {
                info!("event=store_load module=store status=ok count=0 reason=file_missing");
                Ok(Vec::new())
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let started_at = Instant::now();
        match write_json(&self.tasks_path, tasks) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn load_score(&self) -> StoreResult<ScoreState> {
        Ok(read_json(&self.score_path)?.unwrap_or_default())
    }

    fn save_score(&mut self, score: &ScoreState) -> StoreResult<()> {
        write_json(&self.score_path, score).inspect_err(|err| {
            error!("event=score_save module=store status=error error={err}");
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&data)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, buf).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
