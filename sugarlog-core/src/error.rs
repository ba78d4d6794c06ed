//! Error types for diary values.

use thiserror::Error;

/// A time-of-day string that is not a valid `HH:MM` value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid time format '{0}'. Use HH:MM (24-hour).")]
    InvalidTime(String),

    #[error("Time out of range '{0}': hours must be 00-23 and minutes 00-59")]
    OutOfRange(String),
}

/// An entry that breaks one of the diary's value rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Sugar reading {0} is outside 0-40 mmol/L")]
    SugarOutOfRange(f64),

    #[error("Insulin dose of {0} units exceeds the 100 unit limit")]
    InsulinOutOfRange(u8),

    #[error("Bread units {0} must be between 0 and 50")]
    BreadUnitsOutOfRange(f64),

    #[error("Bread units {0} must be a multiple of 0.5")]
    BreadUnitsGranularity(f64),

    #[error("Food comment is {0} characters long; the limit is 200")]
    CommentTooLong(usize),

    #[error("Bread units must be 0 when no food is recorded (got {0})")]
    BreadUnitsWithoutFood(f64),
}
