//! Domain entities. Pure data structures for the core business.
//!
//! No storage or UI types here. Adapters map files and prompts into these.

use crate::domain::calendar::{DateRange, Shift, WeekdaySet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
}

/// A bookable room. `capacity` is informational; nothing checks occupancy against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub capacity: u32,
}

/// A proposed course, not yet stored. Every `Course` field except `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher_id: String,
    pub room_id: String,
    pub shift: Shift,
    pub weekdays: WeekdaySet,
}

impl CourseDraft {
    pub fn dates(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// A stored recurring course occupying one teacher and one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher_id: String,
    pub room_id: String,
    pub shift: Shift,
    pub weekdays: WeekdaySet,
}

impl Course {
    /// Attach a store-assigned identifier to an accepted draft.
    pub fn from_draft(id: String, draft: CourseDraft) -> Self {
        Self {
            id,
            name: draft.name,
            start_date: draft.start_date,
            end_date: draft.end_date,
            teacher_id: draft.teacher_id,
            room_id: draft.room_id,
            shift: draft.shift,
            weekdays: draft.weekdays,
        }
    }

    pub fn dates(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Whole days from `today` until the last day of the course. Negative once finished.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    /// True when the course ends within `window_days` from `today` and has not ended yet.
    pub fn is_ending_soon(&self, today: NaiveDate, window_days: i64) -> bool {
        let left = self.days_remaining(today);
        (0..=window_days).contains(&left)
    }
}

impl From<&Course> for CourseDraft {
    fn from(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            start_date: course.start_date,
            end_date: course.end_date,
            teacher_id: course.teacher_id.clone(),
            room_id: course.room_id.clone(),
            shift: course.shift,
            weekdays: course.weekdays.clone(),
        }
    }
}

/// Name-based course row exchanged with spreadsheets.
///
/// Teacher and room are display names; `TransferService` resolves them to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher: String,
    pub room: String,
    pub shift: Shift,
    pub weekdays: WeekdaySet,
}
