use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::insulin::Insulin;
use crate::error::ValidationError;
use crate::time::TimeOfDay;

pub const MAX_SUGAR: f64 = 40.0;
pub const MAX_INSULIN_UNITS: u8 = 100;
pub const MAX_BREAD_UNITS: f64 = 50.0;
pub const MAX_COMMENT_CHARS: usize = 200;

/// One diary measurement: a sugar reading, an injection, a meal, or any mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    /// Blood sugar in mmol/L; `None` when nothing was measured.
    pub sugar: Option<f64>,
    pub insulin: Option<Insulin>,
    pub bread_units: f64,
    /// Food eaten; blank means the entry has no meal.
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(date: NaiveDate, time: TimeOfDay) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            time,
            sugar: None,
            insulin: None,
            bread_units: 0.0,
            comment: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_sugar(mut self, sugar: f64) -> Self {
        self.sugar = Some(sugar);
        self
    }

    pub fn with_insulin(mut self, insulin: Insulin) -> Self {
        self.insulin = Some(insulin);
        self
    }

    pub fn with_food(mut self, comment: impl Into<String>, bread_units: f64) -> Self {
        self.comment = comment.into();
        self.bread_units = bread_units;
        self
    }

    /// True when the entry records a meal.
    pub fn has_food(&self) -> bool {
        !self.comment.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(sugar) = self.sugar {
            if !(0.0..=MAX_SUGAR).contains(&sugar) {
                return Err(ValidationError::SugarOutOfRange(sugar));
            }
        }

        if let Some(insulin) = &self.insulin {
            if insulin.units > MAX_INSULIN_UNITS {
                return Err(ValidationError::InsulinOutOfRange(insulin.units));
            }
        }

        if !(0.0..=MAX_BREAD_UNITS).contains(&self.bread_units) {
            return Err(ValidationError::BreadUnitsOutOfRange(self.bread_units));
        }
        if (self.bread_units * 2.0).fract() != 0.0 {
            return Err(ValidationError::BreadUnitsGranularity(self.bread_units));
        }

        let comment_chars = self.comment.chars().count();
        if comment_chars > MAX_COMMENT_CHARS {
            return Err(ValidationError::CommentTooLong(comment_chars));
        }

        if !self.has_food() && self.bread_units != 0.0 {
            return Err(ValidationError::BreadUnitsWithoutFood(self.bread_units));
        }

        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Entry: {} {}", self.date, self.time)?;
        writeln!(f, "{}", "=".repeat(30))?;

        match self.sugar {
            Some(sugar) => writeln!(f, "Sugar: {:.1} mmol/L", sugar)?,
            None => writeln!(f, "Sugar: not measured")?,
        }

        if let Some(insulin) = &self.insulin {
            writeln!(f, "Insulin: {}", insulin)?;
        }

        if self.has_food() {
            writeln!(f, "Food: {} ({} BU)", self.comment.trim(), self.bread_units)?;
        }

        Ok(())
    }
}
