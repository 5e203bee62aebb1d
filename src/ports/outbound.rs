//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Course, CourseDraft, CourseRecord, DomainError, Room, Teacher};
use std::path::Path;

/// Booking store. Owns teachers, rooms and accepted courses; assigns identifiers.
///
/// The store does not check for conflicts. Callers run the availability checker
/// against `list_courses` before calling `add_course`.
#[async_trait::async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, DomainError>;

    async fn add_teacher(&self, name: &str) -> Result<Teacher, DomainError>;

    async fn list_rooms(&self) -> Result<Vec<Room>, DomainError>;

    async fn add_room(&self, name: &str, capacity: u32) -> Result<Room, DomainError>;

    /// Point-in-time snapshot of all accepted courses, in insertion order.
    async fn list_courses(&self) -> Result<Vec<Course>, DomainError>;

    /// Persist an accepted draft and return it with its new identifier.
    async fn add_course(&self, draft: CourseDraft) -> Result<Course, DomainError>;
}

/// Spreadsheet port. Reads and writes name-based course rows.
#[async_trait::async_trait]
pub trait SheetPort: Send + Sync {
    /// Read every row. A malformed row fails the whole read.
    async fn read_courses(&self, path: &Path) -> Result<Vec<CourseRecord>, DomainError>;

    /// Write all rows (with header), replacing the file.
    async fn write_courses(&self, path: &Path, records: &[CourseRecord])
    -> Result<(), DomainError>;
}
