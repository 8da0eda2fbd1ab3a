//! Relative date references accepted wherever a schedule date is expected

use crate::domain::ScheduleDate;
use crate::error::{MuseError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// A date as the creator types it: `today`, `next friday`, `2024-06-01`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeReference {
    Today,
    Yesterday,
    Tomorrow,
    /// Today if it matches, otherwise the most recent occurrence
    Weekday(Weekday),
    /// Strictly before today
    LastWeekday(Weekday),
    /// Strictly after today
    NextWeekday(Weekday),
    Exact(ScheduleDate),
}

fn weekday_named(name: &str) -> Option<Weekday> {
    match name {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

impl TimeReference {
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();
        let invalid = || MuseError::InvalidDate(input.to_string());

        match normalized.as_str() {
            "today" | "now" => return Ok(TimeReference::Today),
            "yesterday" => return Ok(TimeReference::Yesterday),
            "tomorrow" => return Ok(TimeReference::Tomorrow),
            _ => {}
        }

        if let Some(rest) = normalized.strip_prefix("last ") {
            return weekday_named(rest.trim())
                .map(TimeReference::LastWeekday)
                .ok_or_else(invalid);
        }
        if let Some(rest) = normalized.strip_prefix("next ") {
            return weekday_named(rest.trim())
                .map(TimeReference::NextWeekday)
                .ok_or_else(invalid);
        }
        if let Some(day) = weekday_named(&normalized) {
            return Ok(TimeReference::Weekday(day));
        }

        ScheduleDate::parse(&normalized)
            .map(TimeReference::Exact)
            .map_err(|_| invalid())
    }

    /// Parse and resolve against `today` in one step
    pub fn resolve_str(input: &str, today: ScheduleDate) -> Result<ScheduleDate> {
        Ok(Self::parse(input)?.resolve(today))
    }

    pub fn resolve(&self, today: ScheduleDate) -> ScheduleDate {
        let base = today.as_naive();
        let resolved = match *self {
            TimeReference::Today => base,
            TimeReference::Yesterday => base - Duration::days(1),
            TimeReference::Tomorrow => base + Duration::days(1),
            TimeReference::Weekday(day) => base - Duration::days(days_since(base, day)),
            TimeReference::LastWeekday(day) => {
                let back = match days_since(base, day) {
                    0 => 7,
                    n => n,
                };
                base - Duration::days(back)
            }
            TimeReference::NextWeekday(day) => {
                let forward = match days_until(base, day) {
                    0 => 7,
                    n => n,
                };
                base + Duration::days(forward)
            }
            TimeReference::Exact(date) => return date,
        };
        ScheduleDate::new(resolved)
    }
}

/// Days back from `base` to the latest `day` on or before it (0..=6)
fn days_since(base: NaiveDate, day: Weekday) -> i64 {
    let from = base.weekday().num_days_from_monday() as i64;
    let to = day.num_days_from_monday() as i64;
    (from - to).rem_euclid(7)
}

/// Days forward from `base` to the earliest `day` on or after it (0..=6)
fn days_until(base: NaiveDate, day: Weekday) -> i64 {
    (7 - days_since(base, day)) % 7
}
