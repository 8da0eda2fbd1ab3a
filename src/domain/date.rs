//! Calendar date used as the entry key

use crate::error::{MuseError, Result};
use chrono::{Local, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated `YYYY-MM-DD` calendar date.
///
/// The string form is fixed-width, so lexicographic order on the
/// displayed value matches chronological order on the date. Stores rely
/// on that when they sort by the raw key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleDate(NaiveDate);

impl ScheduleDate {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        ScheduleDate(date)
    }

    /// Parse a strict `YYYY-MM-DD` string
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let bytes = trimmed.as_bytes();

        // chrono accepts unpadded fields; the key format must stay fixed-width
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_formed {
            return Err(MuseError::InvalidDate(input.to_string()));
        }

        NaiveDate::parse_from_str(trimmed, Self::FORMAT)
            .map(ScheduleDate)
            .map_err(|_| MuseError::InvalidDate(input.to_string()))
    }

    /// Today's date in the local timezone
    pub fn today() -> Self {
        ScheduleDate(Local::now().date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ScheduleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for ScheduleDate {
    type Err = MuseError;

    fn from_str(s: &str) -> Result<Self> {
        ScheduleDate::parse(s)
    }
}

impl From<NaiveDate> for ScheduleDate {
    fn from(date: NaiveDate) -> Self {
        ScheduleDate(date)
    }
}

impl Serialize for ScheduleDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ScheduleDate::parse(&raw).map_err(de::Error::custom)
    }
}
