//! Points and level bookkeeping.
//!
//! # Invariants
//! - `level` starts at 1 and never decreases.
//! - After [`ScoreState::apply`], `points < threshold`.
//! - `threshold` is never zero, so the level-up loop always terminates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points granted for one completed task.
pub const POINTS_PER_COMPLETION: u32 = 10;
/// Points needed for one level-up.
pub const LEVEL_THRESHOLD: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level threshold must be greater than zero")]
pub struct ZeroThresholdError;

/// Award and threshold used when completing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRules {
    award: u32,
    threshold: u32,
}

impl ScoreRules {
    pub fn new(award: u32, threshold: u32) -> Result<Self, ZeroThresholdError> {
        if threshold == 0 {
            return Err(ZeroThresholdError);
        }
        Ok(Self { award, threshold })
    }

    pub fn award(&self) -> u32 {
        self.award
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            award: POINTS_PER_COMPLETION,
            threshold: LEVEL_THRESHOLD,
        }
    }
}

/// Running score. Persisted in the score sidecar file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub points: u32,
    pub level: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
        }
    }
}

impl ScoreState {
    /// Adds one completion award and rolls excess points into levels.
    ///
    /// Returns the number of levels gained.
    pub fn apply(&mut self, rules: &ScoreRules) -> u32 {
        self.points = self.points.saturating_add(rules.award);
        let mut gained = 0;
        while self.points >= rules.threshold {
            self.points -= rules.threshold;
            self.level = self.level.saturating_add(1);
            gained += 1;
        }
        gained
    }
}
