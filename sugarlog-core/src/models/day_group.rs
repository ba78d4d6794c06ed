use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entry::Entry;

/// All entries recorded on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
}

impl DayGroup {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Groups entries by their date, ascending. Entries keep their relative
    /// order inside each day and no empty day is ever produced.
    pub fn group_entries(entries: impl IntoIterator<Item = Entry>) -> Vec<DayGroup> {
        let mut days: BTreeMap<NaiveDate, Vec<Entry>> = BTreeMap::new();
        for entry in entries {
            days.entry(entry.date).or_default().push(entry);
        }

        days.into_iter()
            .map(|(date, entries)| DayGroup { date, entries })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;

    fn entry(day: u32, hour: u8) -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            TimeOfDay::from_hm(hour, 0).unwrap(),
        )
    }

    #[test]
    fn test_group_entries_by_date() {
        let entries = vec![entry(2, 9), entry(1, 20), entry(2, 7), entry(1, 8)];
        let days = DayGroup::group_entries(entries.clone());

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, entries[1].date);
        assert_eq!(days[1].date, entries[0].date);
        // insertion order within a day is kept
        assert_eq!(days[0].entries, vec![entries[1].clone(), entries[3].clone()]);
        assert_eq!(days[1].entries, vec![entries[0].clone(), entries[2].clone()]);
    }

    #[test]
    fn test_group_entries_empty() {
        assert!(DayGroup::group_entries(Vec::new()).is_empty());
    }

    #[test]
    fn test_day_group_new() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let day = DayGroup::new(date);
        assert!(day.is_empty());

        let day = day.with_entries(vec![entry(1, 8)]);
        assert_eq!(day.len(), 1);
    }
}
