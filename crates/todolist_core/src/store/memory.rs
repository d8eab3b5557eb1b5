//! In-process store for tests and embedding.

use super::{StoreError, StoreResult, TaskStore};
use crate::model::score::ScoreState;
use crate::model::task::Task;

/// [`TaskStore`] that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Vec<Task>,
    score: Option<ScoreState>,
    fail_saves: bool,
    fail_score_saves: bool,
    save_count: usize,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store as if a previous session had saved these values.
    pub fn with_state(tasks: Vec<Task>, score: ScoreState) -> Self {
        Self {
            tasks,
            score: Some(score),
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail with [`StoreError::Unavailable`].
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Makes only score saves fail; task-list saves still go through.
    pub fn fail_score_saves(&mut self, fail: bool) {
        self.fail_score_saves = fail;
    }

    /// Number of successful task-list saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn stored_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn stored_score(&self) -> Option<ScoreState> {
        self.score
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_saves {
            return Err(StoreError::Unavailable("saves disabled".to_string()));
        }
        Ok(())
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save(&mut self, tasks: &[Task]) -> StoreResult<()> {
        self.check_writable()?;
        self.tasks = tasks.to_vec();
        self.save_count += 1;
        Ok(())
    }

    fn load_score(&self) -> StoreResult<ScoreState> {
        Ok(self.score.unwrap_or_default())
    }

    fn save_score(&mut self, score: &ScoreState) -> StoreResult<()> {
        self.check_writable()?;
        if self.fail_score_saves {
            return Err(StoreError::Unavailable("score saves disabled".to_string()));
        }
        self.score = Some(*score);
        Ok(())
    }
}
