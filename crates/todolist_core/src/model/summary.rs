//! Dashboard summary projection.

use crate::model::score::ScoreState;
use crate::model::task::Task;
use std::fmt::{Display, Formatter};

/// Counts and score shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub completed_count: usize,
    /// Tasks not yet completed.
    pub pending_count: usize,
    pub total_count: usize,
    /// `0.0` for an empty list.
    pub success_rate_percent: f64,
    pub points: u32,
    pub level: u32,
}

impl Summary {
    pub fn from_tasks(tasks: &[Task], score: ScoreState) -> Self {
        let total_count = tasks.len();
        let completed_count = tasks.iter().filter(|task| task.completed).count();
        let success_rate_percent = if total_count == 0 {
            0.0
        } else {
            completed_count as f64 / total_count as f64 * 100.0
        };

        Self {
            completed_count,
            pending_count: total_count - completed_count,
            total_count,
            success_rate_percent,
            points: score.points,
            level: score.level,
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Completed: {} | Pending: {} | Success Rate: {:.2}% | Points: {} | Level: {}",
            self.completed_count,
            self.pending_count,
            self.success_rate_percent,
            self.points,
            self.level
        )
    }
}
