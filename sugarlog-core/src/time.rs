//! Time-of-day values with minute precision.
//!
//! Entries are keyed within a day by a `HH:MM` string. [`TimeOfDay`] keeps the
//! parsed minute offset so entries compare chronologically, and always prints
//! zero-padded so string order matches time order.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// Number of minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes since midnight, always in `0..1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight (`00:00`).
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(u16::from(hour) * 60 + u16::from(minute)))
        } else {
            None
        }
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Truncates a wall-clock time to the minute.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }
}

/// Parses a strict `HH:MM` string into a [`TimeOfDay`].
pub fn parse_time_of_day(s: &str) -> Result<TimeOfDay, FormatError> {
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !well_formed {
        return Err(FormatError::InvalidTime(s.to_string()));
    }

    let digit = |i: usize| bytes[i] - b'0';
    let hour = digit(0) * 10 + digit(1);
    let minute = digit(3) * 10 + digit(4);

    TimeOfDay::from_hm(hour, minute).ok_or_else(|| FormatError::OutOfRange(s.to_string()))
}

/// Minutes elapsed from `from` to `to` on the same logical day.
///
/// When `to` is earlier than `from` the interval is taken to cross midnight,
/// so the result is always in `0..1440`.
pub fn minutes_between(from: TimeOfDay, to: TimeOfDay) -> u16 {
    if to.0 >= from.0 {
        to.0 - from.0
    } else {
        to.0 + MINUTES_PER_DAY - from.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_of_day(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_time_of_day(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        parse_time_of_day(s).unwrap()
    }

    #[test]
    fn test_parse_valid_times() {
        assert_eq!(t("00:00").minutes(), 0);
        assert_eq!(t("08:45").minutes(), 525);
        assert_eq!(t("23:59").minutes(), 1439);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["8:45", "08:5", "0845", "08-45", "ab:cd", "", "08:45:00", " 08:45"] {
            assert_eq!(
                parse_time_of_day(bad),
                Err(FormatError::InvalidTime(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            parse_time_of_day("24:00"),
            Err(FormatError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_time_of_day("12:60"),
            Err(FormatError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(TimeOfDay::from_hm(7, 5).unwrap().to_string(), "07:05");
        assert_eq!(t("23:59").to_string(), "23:59");
    }

    #[test]
    fn test_string_order_matches_time_order() {
        let a = TimeOfDay::from_hm(9, 30).unwrap();
        let b = TimeOfDay::from_hm(10, 5).unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_minutes_between_same_day() {
        assert_eq!(minutes_between(t("08:00"), t("08:45")), 45);
        assert_eq!(minutes_between(t("08:00"), t("10:10")), 130);
        assert_eq!(minutes_between(t("12:00"), t("12:00")), 0);
    }

    #[test]
    fn test_minutes_between_wraps_midnight() {
        assert_eq!(minutes_between(t("23:30"), t("00:15")), 45);
        assert_eq!(minutes_between(t("00:01"), t("00:00")), 1439);
    }

    #[test]
    fn test_from_naive_time_truncates_seconds() {
        let time = NaiveTime::from_hms_opt(14, 7, 59).unwrap();
        assert_eq!(TimeOfDay::from_naive_time(time).to_string(), "14:07");
    }

    #[test]
    fn test_from_minutes_bounds() {
        assert!(TimeOfDay::from_minutes(1439).is_some());
        assert!(TimeOfDay::from_minutes(MINUTES_PER_DAY).is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let time = t("06:30");
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"06:30\"");
        assert_eq!(serde_json::from_str::<TimeOfDay>(&json).unwrap(), time);
        assert!(serde_json::from_str::<TimeOfDay>("\"6:30\"").is_err());
    }
}
