//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod availability;
pub mod calendar;
pub mod entities;
pub mod errors;

pub use availability::{Availability, Conflict, SharedResource, check_availability, is_available};
pub use calendar::{DateRange, Shift, Weekday, WeekdaySet};
pub use entities::{Course, CourseDraft, CourseRecord, Room, Teacher};
pub use errors::DomainError;
