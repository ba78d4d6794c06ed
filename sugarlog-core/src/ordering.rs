//! Chronological ordering of entries and days.
//!
//! All sorts are stable: entries logged at the same minute keep the order
//! they were given in, and so do days sharing a date.

use crate::models::{DayGroup, Entry};

/// Sorts a day's entries by time of day, earliest first.
pub fn sort_by_time_of_day(entries: &mut [Entry]) {
    entries.sort_by_key(|entry| entry.time);
}

/// Borrowing variant of [`sort_by_time_of_day`].
pub fn sorted_by_time_of_day(entries: &[Entry]) -> Vec<&Entry> {
    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.time);
    ordered
}

/// Sorts days newest first, the order a diary is read in.
pub fn sort_days_by_date(days: &mut [DayGroup]) {
    days.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Sorts days oldest first, the order streaks are counted in.
pub fn sort_days_ascending(days: &mut [DayGroup]) {
    days.sort_by_key(|day| day.date);
}

/// Borrowing variant of [`sort_days_ascending`].
pub fn sorted_days_ascending(days: &[DayGroup]) -> Vec<&DayGroup> {
    let mut ordered: Vec<&DayGroup> = days.iter().collect();
    ordered.sort_by_key(|day| day.date);
    ordered
}
