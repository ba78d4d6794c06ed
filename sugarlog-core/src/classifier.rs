//! Glycemic threshold classifier.
//!
//! A reading is judged against the fasting limit unless a meal was logged
//! earlier the same day, in which case the limit depends on how long ago that
//! meal was:
//!
//! | situation                                   | high when sugar > |
//! |---------------------------------------------|-------------------|
//! | first entry of the day                      | 5.0               |
//! | reading logged together with food           | 5.0               |
//! | no earlier meal that day                    | 5.0               |
//! | up to 60 min after the last meal            | 7.0               |
//! | up to 120 min after the last meal           | 6.7               |
//! | more than 120 min after the last meal       | 5.8               |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Entry;
use crate::ordering::sorted_by_time_of_day;
use crate::time::minutes_between;

/// How a sugar reading is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SugarLevel {
    Normal,
    High,
}

impl fmt::Display for SugarLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SugarLevel::Normal => write!(f, "normal"),
            SugarLevel::High => write!(f, "high"),
        }
    }
}

/// Upper limits (mmol/L) for a normal reading. A reading equal to its limit is
/// still normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub fasting: f64,
    pub first_window_minutes: u16,
    pub first_window_limit: f64,
    pub second_window_minutes: u16,
    pub second_window_limit: f64,
    pub late_limit: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fasting: 5.0,
            first_window_minutes: 60,
            first_window_limit: 7.0,
            second_window_minutes: 120,
            second_window_limit: 6.7,
            late_limit: 5.8,
        }
    }
}

impl Thresholds {
    /// Limit for a reading taken `elapsed` minutes after a meal.
    pub fn post_meal_limit(&self, elapsed: u16) -> f64 {
        if elapsed <= self.first_window_minutes {
            self.first_window_limit
        } else if elapsed <= self.second_window_minutes {
            self.second_window_limit
        } else {
            self.late_limit
        }
    }
}

/// Classifies sugar readings against a set of [`Thresholds`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classifies `entry` against the other entries of its day.
    ///
    /// `siblings` is the day's full entry list, `entry` included, in any
    /// order. Returns `None` when the entry has no sugar reading. An entry
    /// whose time is not among the siblings is reported as normal.
    ///
    /// Only meals logged strictly before the reading's minute count. A meal
    /// entered separately at the same minute is ignored, so the reading is
    /// judged against the meal before it, or the fasting limit if none.
    pub fn classify(&self, entry: &Entry, siblings: &[Entry]) -> Option<SugarLevel> {
        let sugar = entry.sugar?;
        let ordered = sorted_by_time_of_day(siblings);

        let Some(position) = ordered.iter().position(|e| e.time == entry.time) else {
            return Some(SugarLevel::Normal);
        };

        let limit = self.limit_at(entry, &ordered, position);
        Some(if sugar > limit {
            SugarLevel::High
        } else {
            SugarLevel::Normal
        })
    }

    /// True when `entry` has a reading above its limit.
    pub fn is_high(&self, entry: &Entry, siblings: &[Entry]) -> bool {
        self.classify(entry, siblings) == Some(SugarLevel::High)
    }

    /// True when any reading of the day is high.
    pub fn day_has_high(&self, entries: &[Entry]) -> bool {
        entries.iter().any(|entry| self.is_high(entry, entries))
    }

    fn limit_at(&self, entry: &Entry, ordered: &[&Entry], position: usize) -> f64 {
        if position == 0 || entry.has_food() {
            return self.thresholds.fasting;
        }

        match ordered[..position].iter().rev().find(|e| e.has_food()) {
            Some(meal) => {
                let elapsed = minutes_between(meal.time, entry.time);
                self.thresholds.post_meal_limit(elapsed)
            }
            None => self.thresholds.fasting,
        }
    }
}

/// [`Classifier::classify`] with the default thresholds.
pub fn classify(entry: &Entry, siblings: &[Entry]) -> Option<SugarLevel> {
    Classifier::default().classify(entry, siblings)
}

/// [`Classifier::is_high`] with the default thresholds.
pub fn is_high(entry: &Entry, siblings: &[Entry]) -> bool {
    Classifier::default().is_high(entry, siblings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(time: &str) -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            time.parse().unwrap(),
        )
    }

    fn reading(time: &str, sugar: f64) -> Entry {
        at(time).with_sugar(sugar)
    }

    fn meal(time: &str, food: &str) -> Entry {
        at(time).with_food(food, 1.0)
    }

    #[test]
    fn test_no_reading_is_not_classified() {
        let day = vec![meal("08:00", "oatmeal"), at("09:00")];
        assert_eq!(classify(&day[1], &day), None);
        assert!(!is_high(&day[1], &day));
    }

    #[test]
    fn test_fasting_reading_normal() {
        let day = vec![reading("08:00", 4.5)];
        assert!(!is_high(&day[0], &day));
    }

    #[test]
    fn test_fasting_reading_high() {
        let day = vec![reading("08:00", 6.0)];
        assert!(is_high(&day[0], &day));
    }

    #[test]
    fn test_reading_within_first_hour_after_meal() {
        let day = vec![meal("08:00", "oatmeal"), reading("08:45", 7.5)];
        assert!(is_high(&day[1], &day));
    }

    #[test]
    fn test_reading_within_two_hours_after_meal() {
        let day = vec![meal("08:00", "oatmeal"), reading("10:10", 6.9)];
        // 130 minutes after the meal puts this past the second window
        assert!(is_high(&day[1], &day));

        let day = vec![meal("08:45", "oatmeal"), reading("10:10", 6.9)];
        // 85 minutes after the meal: limit 6.7
        assert!(is_high(&day[1], &day));
        let day = vec![meal("08:45", "oatmeal"), reading("10:10", 6.7)];
        assert!(!is_high(&day[1], &day));
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.post_meal_limit(0), 7.0);
        assert_eq!(thresholds.post_meal_limit(60), 7.0);
        assert_eq!(thresholds.post_meal_limit(61), 6.7);
        assert_eq!(thresholds.post_meal_limit(120), 6.7);
        assert_eq!(thresholds.post_meal_limit(121), 5.8);
    }

    #[test]
    fn test_reading_at_exactly_sixty_minutes() {
        let day = vec![meal("12:00", "soup"), reading("13:00", 7.0)];
        assert!(!is_high(&day[1], &day));
        let day = vec![meal("12:00", "soup"), reading("13:00", 7.1)];
        assert!(is_high(&day[1], &day));
    }

    #[test]
    fn test_meal_at_same_minute_as_reading_is_ignored() {
        let day = vec![
            meal("07:00", "toast"),
            meal("08:00", "coffee"),
            reading("08:00", 6.5),
        ];
        // judged against the 07:00 meal: 60 minutes, limit 7.0
        assert!(!is_high(&day[2], &day));

        let day = vec![meal("08:00", "coffee"), reading("08:00", 5.5)];
        // no earlier meal: fasting limit
        assert!(is_high(&day[1], &day));
    }

    #[test]
    fn test_late_post_meal_limit() {
        let day = vec![meal("08:00", "toast"), reading("11:00", 5.9)];
        assert!(is_high(&day[1], &day));
        let day = vec![meal("08:00", "toast"), reading("11:00", 5.8)];
        assert!(!is_high(&day[1], &day));
    }

    #[test]
    fn test_first_entry_uses_fasting_limit_regardless_of_siblings() {
        let first = reading("06:30", 5.5).with_food("juice", 1.0);
        let day = vec![first, meal("07:00", "bread"), reading("07:30", 4.0)];
        assert!(is_high(&day[0], &day));

        let day = vec![reading("06:30", 5.0), meal("07:00", "bread")];
        assert!(!is_high(&day[0], &day));
    }

    #[test]
    fn test_reading_with_food_uses_fasting_limit() {
        // 6.5 would be normal 30 minutes after breakfast, but food is logged
        // alongside this reading
        let day = vec![
            meal("08:00", "breakfast"),
            reading("08:30", 6.5).with_food("apple", 1.0),
        ];
        assert!(is_high(&day[1], &day));
    }

    #[test]
    fn test_no_prior_meal_uses_fasting_limit() {
        let day = vec![reading("07:00", 4.8), reading("12:00", 5.3)];
        assert!(is_high(&day[1], &day));

        // a meal logged later in the day does not count
        let day = vec![
            reading("07:00", 4.8),
            reading("12:00", 5.3),
            meal("13:00", "lunch"),
        ];
        assert!(is_high(&day[1], &day));
    }

    #[test]
    fn test_nearest_prior_meal_is_used() {
        let day = vec![
            meal("07:00", "breakfast"),
            reading("09:30", 6.0),
            meal("12:00", "lunch"),
            reading("12:40", 6.9),
        ];
        // 40 minutes after lunch, not 340 after breakfast
        assert!(!is_high(&day[3], &day));
        // 150 minutes after breakfast
        assert!(is_high(&day[1], &day));
    }

    #[test]
    fn test_whitespace_comment_is_not_a_meal() {
        let day = vec![
            reading("07:00", 4.5),
            at("08:00").with_food("   ", 0.0),
            reading("08:30", 6.5),
        ];
        assert!(is_high(&day[2], &day));
    }

    #[test]
    fn test_target_not_among_siblings_is_normal() {
        let day = vec![reading("07:00", 4.5)];
        let unsaved = reading("09:00", 15.0);
        assert_eq!(classify(&unsaved, &day), Some(SugarLevel::Normal));
    }

    #[test]
    fn test_insensitive_to_sibling_order() {
        let day = vec![
            reading("06:50", 5.1),
            meal("08:00", "oatmeal"),
            reading("08:40", 7.2),
            reading("10:30", 6.8),
            meal("13:00", "soup"),
            reading("16:00", 5.9),
            reading("21:00", 5.7),
        ];
        let expected: Vec<_> = day.iter().map(|e| classify(e, &day)).collect();

        let mut reversed = day.clone();
        reversed.reverse();
        let mut rotated = day.clone();
        rotated.rotate_left(3);
        let mut swapped = day.clone();
        swapped.swap(0, 5);
        swapped.swap(2, 4);

        for permuted in [reversed, rotated, swapped] {
            let actual: Vec<_> = day.iter().map(|e| classify(e, &permuted)).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_day_has_high() {
        let clean = vec![reading("07:00", 4.9), meal("08:00", "eggs"), reading("09:00", 6.5)];
        assert!(!Classifier::new().day_has_high(&clean));

        let spiked = vec![reading("07:00", 4.9), meal("08:00", "cake"), reading("08:30", 9.0)];
        assert!(Classifier::new().day_has_high(&spiked));

        assert!(!Classifier::new().day_has_high(&[]));
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = Classifier::with_thresholds(Thresholds {
            fasting: 6.1,
            ..Thresholds::default()
        });
        let day = vec![reading("08:00", 6.0)];
        assert_eq!(classifier.classify(&day[0], &day), Some(SugarLevel::Normal));
        assert_eq!(classifier.thresholds().fasting, 6.1);
    }

    #[test]
    fn test_thresholds_partial_deserialize() {
        let thresholds: Thresholds = serde_json::from_str(r#"{"late_limit": 6.0}"#).unwrap();
        assert_eq!(thresholds.late_limit, 6.0);
        assert_eq!(thresholds.fasting, 5.0);
        assert_eq!(thresholds.first_window_minutes, 60);
    }
}
