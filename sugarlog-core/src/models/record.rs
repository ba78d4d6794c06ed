//! Exchange format for exported diaries.
//!
//! A diary file is a JSON array of days, each holding its entries without a
//! repeated date:
//!
//! ```json
//! [{ "date": "2025-01-15",
//!    "entries": [{ "time": "08:00", "sugar": 5.2, "breadUnits": 2,
//!                  "comment": "oatmeal", "insulin": { "type": "rapid", "units": 4 } }] }]
//! ```
//!
//! Older exports stored an unmeasured sugar as `""` and had no entry ids;
//! both are accepted on read.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::day_group::DayGroup;
use super::entry::Entry;
use super::insulin::Insulin;
use crate::time::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub time: TimeOfDay,
    #[serde(
        default,
        deserialize_with = "deserialize_reading",
        skip_serializing_if = "Option::is_none"
    )]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulin: Option<Insulin>,
    #[serde(default)]
    pub bread_units: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl DayRecord {
    pub fn from_group(day: &DayGroup) -> Self {
        Self {
            date: day.date,
            entries: day.entries.iter().map(EntryRecord::from_entry).collect(),
        }
    }

    /// Rebuilds the day, stamping every entry with the record's date.
    pub fn into_group(self) -> DayGroup {
        let date = self.date;
        DayGroup::new(date).with_entries(
            self.entries
                .into_iter()
                .map(|record| record.into_entry(date))
                .collect(),
        )
    }
}

impl EntryRecord {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            time: entry.time,
            sugar: entry.sugar,
            insulin: entry.insulin,
            bread_units: entry.bread_units,
            comment: entry.comment.clone(),
        }
    }

    pub fn into_entry(self, date: NaiveDate) -> Entry {
        Entry {
            id: self.id,
            date,
            time: self.time,
            sugar: self.sugar,
            insulin: self.insulin,
            bread_units: self.bread_units,
            comment: self.comment,
            created_at: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReading {
    Number(f64),
    Text(String),
}

fn deserialize_reading<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawReading>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawReading::Number(value)) => Ok(Some(value)),
        Some(RawReading::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawReading::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid sugar reading '{}'", text))),
    }
}
