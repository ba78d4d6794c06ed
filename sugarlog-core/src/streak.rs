//! Clean-day streaks and the rewards they unlock.
//!
//! Days are walked oldest first. Moving from one logged day to the next is a
//! *clean transition* when the earlier day had no high reading and the later
//! day has at least one entry. Every clean transition raises a running total
//! that never goes down; the total decides which reward tier the transition
//! earns. The current streak is the number of clean transitions since the last
//! non-clean one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::Classifier;
use crate::models::DayGroup;
use crate::ordering::sorted_days_ascending;

/// Every this many clean transitions earns a unique reward.
pub const UNIQUE_EVERY: u32 = 5;
/// Every this many clean transitions earns a premium reward.
pub const PREMIUM_EVERY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    Regular,
    Unique,
    Premium,
}

impl RewardTier {
    /// Tier earned by the transition that brings the running total to `total`.
    pub fn for_total(total: u32) -> Self {
        if total % PREMIUM_EVERY == 0 {
            RewardTier::Premium
        } else if total % UNIQUE_EVERY == 0 {
            RewardTier::Unique
        } else {
            RewardTier::Regular
        }
    }
}

impl fmt::Display for RewardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardTier::Regular => write!(f, "regular"),
            RewardTier::Unique => write!(f, "unique"),
            RewardTier::Premium => write!(f, "premium"),
        }
    }
}

/// A clean move from `previous_date` to `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanTransition {
    /// The later day; rewards are keyed by this date.
    pub date: NaiveDate,
    pub previous_date: NaiveDate,
    /// Running total of clean transitions including this one.
    pub total: u32,
    pub tier: RewardTier,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub total_clean: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub regular: u32,
    pub unique: u32,
    pub premium: u32,
    pub last_transition_date: Option<NaiveDate>,
    pub transitions: Vec<CleanTransition>,
}

impl StreakState {
    fn record_clean(&mut self, previous_date: NaiveDate, date: NaiveDate) {
        self.total_clean += 1;
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
        self.last_transition_date = Some(date);
        self.transitions.push(CleanTransition {
            date,
            previous_date,
            total: self.total_clean,
            tier: RewardTier::for_total(self.total_clean),
        });
    }

    fn record_broken(&mut self) {
        self.current_streak = 0;
    }

    fn finish(mut self) -> Self {
        self.unique = self.total_clean / UNIQUE_EVERY;
        self.premium = self.total_clean / PREMIUM_EVERY;
        self.regular = self.total_clean - self.unique;
        self
    }
}

/// Derives streak state from a diary using a [`Classifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakEngine {
    classifier: Classifier,
}

impl StreakEngine {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Walks `days` (any order) and returns the resulting state. An empty or
    /// single-day diary has no transitions.
    pub fn compute(&self, days: &[DayGroup]) -> StreakState {
        let ordered = sorted_days_ascending(days);
        let mut state = StreakState::default();

        for pair in ordered.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let prev_clean = !self.classifier.day_has_high(&prev.entries);

            if prev_clean && !curr.is_empty() {
                state.record_clean(prev.date, curr.date);
                tracing::debug!(
                    "clean transition {} -> {} (total {}, streak {})",
                    prev.date,
                    curr.date,
                    state.total_clean,
                    state.current_streak
                );
            } else {
                if state.current_streak > 0 {
                    tracing::debug!(
                        "streak of {} broken at {} -> {}",
                        state.current_streak,
                        prev.date,
                        curr.date
                    );
                }
                state.record_broken();
            }
        }

        state.finish()
    }
}

/// [`StreakEngine::compute`] with the default thresholds.
pub fn compute_streak_state(days: &[DayGroup]) -> StreakState {
    StreakEngine::default().compute(days)
}
