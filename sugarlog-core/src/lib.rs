//! sugarlog core library
//!
//! Diary models and the pure logic behind them: time-of-day parsing, entry
//! ordering, the glycemic classifier and the clean-day streak engine.

pub mod classifier;
pub mod error;
pub mod models;
pub mod ordering;
pub mod stats;
pub mod streak;
pub mod time;

pub use classifier::{classify, is_high, Classifier, SugarLevel, Thresholds};
pub use error::{FormatError, ValidationError};
pub use models::{DayGroup, DayRecord, Entry, EntryRecord, Insulin, InsulinKind};
pub use ordering::{
    sort_by_time_of_day, sort_days_ascending, sort_days_by_date, sorted_by_time_of_day,
    sorted_days_ascending,
};
pub use stats::DayStats;
pub use streak::{compute_streak_state, CleanTransition, RewardTier, StreakEngine, StreakState};
pub use time::{minutes_between, parse_time_of_day, TimeOfDay};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
