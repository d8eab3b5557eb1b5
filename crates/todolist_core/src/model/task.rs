//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the tasks file.
//! - Validate user-entered fields before a task enters the list.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` and `category` are non-empty. Text is stored as entered.
//! - `completed` only moves from `false` to `true`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier for a task, generated at creation.
pub type TaskId = Uuid;

/// Task priority as chosen by the user.
///
/// Serialized with its variant name (`"High"`, `"Medium"`, `"Low"`) to stay
/// readable in the tasks file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported priority `{0}`; expected high|medium|low")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

/// Lifecycle state derived from [`Task::completed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    /// Terminal; no transition leaves this state.
    Completed,
}

/// Validation failures for user-entered task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    #[error("task title is required")]
    EmptyTitle,
    #[error("task category is required")]
    EmptyCategory,
}

/// User input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
}

impl NewTask {
    /// Creates input with empty description and default priority.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Canonical task record.
///
/// Field order matches the on-disk object layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Nil when read from a file written before ids existed; see
    /// [`assign_missing_ids`].
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Builds a pending task from user input with a generated stable ID.
    ///
    /// Only an empty title or category is rejected.
    pub fn create(input: NewTask) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            category: input.category,
            priority: input.priority,
            completed: false,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.category.is_empty() {
            return Err(TaskValidationError::EmptyCategory);
        }
        Ok(())
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }

    /// Moves the task to `Completed`.
    ///
    /// Returns `false` when the task was already completed.
    pub fn mark_completed(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }

    /// Case-insensitive substring match against the title.
    pub fn title_matches(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
    }
}

/// Gives every task with a nil id a fresh one.
///
/// Returns how many ids were assigned.
pub fn assign_missing_ids(tasks: &mut [Task]) -> usize {
    let mut assigned = 0;
    for task in tasks.iter_mut().filter(|task| task.id.is_nil()) {
        task.id = Uuid::new_v4();
        assigned += 1;
    }
    assigned
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mark = match self.status() {
            TaskStatus::Completed => '✔',
            TaskStatus::Pending => '❌',
        };
        write!(
            f,
            "{} ({}, {}) - {mark}",
            self.title, self.category, self.priority
        )
    }
}
