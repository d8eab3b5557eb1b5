//! Task list use-case service.
//!
//! # Responsibility
//! - Own the in-memory task list and running score for one session.
//! - Validate input, apply mutations, persist after every change.
//! - Resolve list positions to stable IDs for presentation callers.
//!
//! # Invariants
//! - Every successful mutation has been written to the store before returning.
//! - A failed write rolls the in-memory state back to the last saved state.
//! - Validation, range and not-found errors leave state unchanged.

use crate::model::score::{ScoreRules, ScoreState};
use crate::model::summary::Summary;
use crate::model::task::{assign_missing_ids, NewTask, Task, TaskId, TaskValidationError};
use crate::store::{StoreError, TaskStore};
use log::{error, info, warn};
use thiserror::Error;

/// Service error for task list use-cases.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    /// No task at the selected position.
    #[error("no task at position {index} (list has {len} task(s))")]
    OutOfRange { index: usize, len: usize },
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task already completed: {0}")]
    AlreadyCompleted(TaskId),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A later write failed and restoring the earlier one failed too, so the
    /// tasks file may disagree with memory.
    #[error("{source}; restoring the tasks file also failed: {rollback}")]
    PartialWrite {
        #[source]
        source: StoreError,
        rollback: StoreError,
    },
}

pub type TodoResult<T> = Result<T, TodoError>;

/// Result of completing one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Task after the transition.
    pub task: Task,
    pub points_awarded: u32,
    pub levels_gained: u32,
    /// Score after the award.
    pub score: ScoreState,
}

impl CompletionOutcome {
    /// User-facing notices: one per gained level, then the completion notice.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = (0..self.levels_gained)
            .rev()
            .map(|back| self.score.level.saturating_sub(back))
            .map(|level| format!("Congratulations! You've reached Level {level}."))
            .collect::<Vec<_>>();
        messages.push(format!(
            "Task '{}' marked as completed! {} points awarded!",
            self.task.title, self.points_awarded
        ));
        messages
    }
}

/// Task list plus scoring model over a [`TaskStore`].
pub struct TodoList<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
    score: ScoreState,
    rules: ScoreRules,
}

impl<S: TaskStore> TodoList<S> {
    /// Loads tasks and score from `store` with default scoring rules.
    pub fn open(store: S) -> TodoResult<Self> {
        Self::open_with_rules(store, ScoreRules::default())
    }

    /// Records stored without an id get one here, written back before
    /// returning so the ids hold across reopens.
    pub fn open_with_rules(mut store: S, rules: ScoreRules) -> TodoResult<Self> {
        let mut tasks = store.load()?;
        let score = store.load_score()?;
        let assigned = assign_missing_ids(&mut tasks);
        if assigned > 0 {
            store.save(&tasks).inspect_err(|err| {
                error!("event=task_ids_assign module=service status=error count={assigned} error={err}");
            })?;
            info!("event=task_ids_assign module=service status=ok count={assigned}");
        }
        info!(
            "event=todo_open module=service status=ok count={} level={}",
            tasks.len(),
            score.level
        );
        Ok(Self {
            store,
            tasks,
            score,
            rules,
        })
    }

    /// Appends a validated task and persists the list.
    pub fn add(&mut self, input: NewTask) -> TodoResult<Task> {
        let task = Task::create(input).inspect_err(|err| {
            warn!("event=task_add module=service status=rejected reason={err:?}");
        })?;

        self.tasks.push(task.clone());
        if let Err(err) = self.store.save(&self.tasks) {
            self.tasks.pop();
            return Err(err.into());
        }

        info!(
            "event=task_add module=service status=ok task_id={} count={}",
            task.id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Completes a pending task and awards points.
    ///
    /// Completing an already completed task is rejected without awarding.
    pub fn complete(&mut self, id: TaskId) -> TodoResult<CompletionOutcome> {
        let index = self.position(id).ok_or(TodoError::NotFound(id))?;
        if self.tasks[index].completed {
            return Err(TodoError::AlreadyCompleted(id));
        }

        let previous_score = self.score;
        self.tasks[index].mark_completed();
        let levels_gained = self.score.apply(&self.rules);

        if let Err(err) = self.store.save(&self.tasks) {
            self.tasks[index].completed = false;
            self.score = previous_score;
            return Err(err.into());
        }
        if let Err(err) = self.store.save_score(&self.score) {
            self.tasks[index].completed = false;
            self.score = previous_score;
            // Task file already holds the completion.
            if let Err(rollback) = self.store.save(&self.tasks) {
                error!(
                    "event=task_complete module=service status=error stage=rollback task_id={id} error={rollback}"
                );
                return Err(TodoError::PartialWrite {
                    source: err,
                    rollback,
                });
            }
            return Err(err.into());
        }

        info!(
            "event=task_complete module=service status=ok task_id={} points={} level={} levels_gained={}",
            id, self.score.points, self.score.level, levels_gained
        );
        Ok(CompletionOutcome {
            task: self.tasks[index].clone(),
            points_awarded: self.rules.award(),
            levels_gained,
            score: self.score,
        })
    }

    /// Removes a task and persists the list.
    pub fn delete(&mut self, id: TaskId) -> TodoResult<Task> {
        let index = self.position(id).ok_or(TodoError::NotFound(id))?;
        let task = self.tasks.remove(index);

        if let Err(err) = self.store.save(&self.tasks) {
            self.tasks.insert(index, task);
            return Err(err.into());
        }

        info!(
            "event=task_delete module=service status=ok task_id={} count={}",
            id,
            self.tasks.len()
        );
        Ok(task)
    }

    /// Position of the first task whose title contains `query`, ignoring case.
    ///
    /// An empty query matches nothing.
    pub fn search(&self, query: &str) -> Option<usize> {
        if query.is_empty() {
            return None;
        }
        let needle = query.to_lowercase();
        self.tasks.iter().position(|task| task.title_matches(&needle))
    }

    /// Resolves a list position to the task's stable ID.
    pub fn id_at(&self, index: usize) -> TodoResult<TaskId> {
        self.tasks
            .get(index)
            .map(|task| task.id)
            .ok_or(TodoError::OutOfRange {
                index,
                len: self.tasks.len(),
            })
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn summary(&self) -> Summary {
        Summary::from_tasks(&self.tasks, self.score)
    }

    /// Writes tasks and score even when nothing changed.
    pub fn save(&mut self) -> TodoResult<()> {
        self.store.save(&self.tasks)?;
        self.store.save_score(&self.score)?;
        Ok(())
    }

    /// Replaces in-memory state with what the store holds.
    pub fn reload(&mut self) -> TodoResult<()> {
        let tasks = self.store.load()?;
        let score = self.store.load_score()?;
        self.tasks = tasks;
        self.score = score;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
