//! Availability checker: does a proposed course double-book a teacher or a room?
//!
//! A proposal conflicts with an existing course when all four hold at once:
//! the inclusive date ranges overlap, the shifts are equal, the weekday sets
//! intersect, and the teacher or the room is shared.
//!
//! Pure and synchronous. The proposal must not be part of `existing`.

use crate::domain::calendar::{DateRange, Shift, Weekday, common_weekdays, shares_weekday};
use crate::domain::entities::{Course, CourseDraft};
use std::fmt;

/// Which resource two conflicting courses both occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedResource {
    Teacher,
    Room,
    TeacherAndRoom,
}

impl SharedResource {
    fn between(proposed: &CourseDraft, existing: &Course) -> Option<Self> {
        let teacher = proposed.teacher_id == existing.teacher_id;
        let room = proposed.room_id == existing.room_id;
        match (teacher, room) {
            (true, true) => Some(Self::TeacherAndRoom),
            (true, false) => Some(Self::Teacher),
            (false, true) => Some(Self::Room),
            (false, false) => None,
        }
    }
}

impl fmt::Display for SharedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SharedResource::Teacher => "teacher",
            SharedResource::Room => "room",
            SharedResource::TeacherAndRoom => "teacher and room",
        })
    }
}

/// Why a proposal was rejected: the first existing course it collides with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub course_id: String,
    pub course_name: String,
    pub shared: SharedResource,
    pub shift: Shift,
    pub weekdays: Vec<Weekday>,
    /// Days both courses run (intersection of their ranges).
    pub overlap: DateRange,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self
            .weekdays
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "{} already booked by '{}' ({}) on {} {} between {}",
            self.shared, self.course_name, self.course_id, days, self.shift, self.overlap
        )
    }
}

/// Outcome of checking a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Conflict(Conflict),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Check `proposed` against every course in `existing`, stopping at the first conflict.
pub fn check_availability(proposed: &CourseDraft, existing: &[Course]) -> Availability {
    existing
        .iter()
        .find_map(|course| conflict_with(proposed, course))
        .map_or(Availability::Available, Availability::Conflict)
}

/// Boolean form of [`check_availability`].
pub fn is_available(proposed: &CourseDraft, existing: &[Course]) -> bool {
    check_availability(proposed, existing).is_available()
}

fn conflict_with(proposed: &CourseDraft, existing: &Course) -> Option<Conflict> {
    let overlap = proposed.dates().intersection(&existing.dates())?;
    if proposed.shift != existing.shift {
        return None;
    }
    if !shares_weekday(&proposed.weekdays, &existing.weekdays) {
        return None;
    }
    let shared = SharedResource::between(proposed, existing)?;
    Some(Conflict {
        course_id: existing.id.clone(),
        course_name: existing.name.clone(),
        shared,
        shift: existing.shift,
        weekdays: common_weekdays(&proposed.weekdays, &existing.weekdays),
        overlap,
    })
}
