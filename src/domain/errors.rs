//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. A scheduling conflict is not an
//! error; it is reported through `Availability` / `Admission`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("A course needs at least one weekday")]
    NoWeekdays,

    #[error("Room capacity must be at least 1")]
    InvalidCapacity,

    #[error("Unknown teacher: {0}")]
    UnknownTeacher(String),

    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Sheet error: {0}")]
    Sheet(String),

    #[error("UI error: {0}")]
    Ui(String),
}
