//! Calendar primitives: inclusive date ranges, shifts, and weekday sets.
//!
//! Time-of-day never matters here. A course occupies whole days inside its range,
//! on its weekdays, during one coarse shift.

use crate::domain::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Inclusive calendar date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when `start <= end`.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Inclusive overlap. Ranges that only touch at an endpoint overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.end < other.start || self.start > other.end)
    }

    /// The shared days of two ranges, or None when they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self::new(self.start.max(other.start), self.end.min(other.end)))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Coarse daily time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Evening];

    /// Serialized form (`morning`, `afternoon`, `evening`).
    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Afternoon => "afternoon",
            Shift::Evening => "evening",
        }
    }

    /// Human label for menus and cards.
    pub fn label(self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Evening => "Evening",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Shift::ALL
            .into_iter()
            .find(|shift| shift.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::Parse(format!("unknown shift '{}'", needle)))
    }
}

/// Day on which a course may recur. Sunday is never scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// English weekday name, as serialized in sheets.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = DomainError;

    /// Accepts full English names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                day.name().eq_ignore_ascii_case(needle)
                    || day.abbreviation().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| DomainError::Parse(format!("unknown weekday '{}'", needle)))
    }
}

/// Ordered set of weekdays a course recurs on.
pub type WeekdaySet = BTreeSet<Weekday>;

/// True when the two sets have at least one day in common.
pub fn shares_weekday(a: &WeekdaySet, b: &WeekdaySet) -> bool {
    !a.is_disjoint(b)
}

/// Days present in both sets, in week order.
pub fn common_weekdays(a: &WeekdaySet, b: &WeekdaySet) -> Vec<Weekday> {
    a.intersection(b).copied().collect()
}

/// Parse a comma-joined weekday list (`"Monday,Wednesday"`). Blank items are skipped.
pub fn parse_weekdays(s: &str) -> Result<WeekdaySet, DomainError> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(Weekday::from_str)
        .collect()
}

/// Inverse of [`parse_weekdays`].
pub fn join_weekdays(days: &WeekdaySet) -> String {
    days.iter().map(|d| d.name()).collect::<Vec<_>>().join(",")
}
