//! Spreadsheet import/export.
//!
//! Export resolves teacher/room ids to names. Import resolves names back to ids and admits
//! every row through `BookingService`, so imported rows obey the same conflict rules as
//! hand-entered ones. Unknown names are registered only when their row is accepted.

use crate::domain::{Conflict, Course, CourseDraft, CourseRecord, DomainError, Room, Teacher};
use crate::ports::SheetPort;
use crate::usecases::booking_service::{Admission, BookingService, NewEntities};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// What happened to one imported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Imported(Course),
    Conflict(Conflict),
    Invalid(String),
}

/// Summary of a whole import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    /// (row name, conflict) for rows rejected by the availability check.
    pub conflicts: Vec<(String, Conflict)>,
    /// (row name, reason) for rows that failed validation.
    pub invalid: Vec<(String, String)>,
}

impl ImportReport {
    pub fn record(&mut self, name: &str, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Imported(_) => self.imported += 1,
            RowOutcome::Conflict(c) => self.conflicts.push((name.to_string(), c)),
            RowOutcome::Invalid(reason) => self.invalid.push((name.to_string(), reason)),
        }
    }

    pub fn skipped(&self) -> usize {
        self.conflicts.len() + self.invalid.len()
    }
}

/// Capacity given to rooms first seen in an imported sheet.
const IMPORTED_ROOM_CAPACITY: u32 = 1;

/// Import/export service.
pub struct TransferService {
    bookings: Arc<BookingService>,
    sheet: Arc<dyn SheetPort>,
    create_missing: bool,
}

impl TransferService {
    pub fn new(
        bookings: Arc<BookingService>,
        sheet: Arc<dyn SheetPort>,
        create_missing: bool,
    ) -> Self {
        Self {
            bookings,
            sheet,
            create_missing,
        }
    }

    /// Write every stored course to `path`. Returns the number of rows written.
    pub async fn export_sheet(&self, path: &Path) -> Result<usize, DomainError> {
        let teachers: HashMap<String, String> = self
            .bookings
            .list_teachers()
            .await?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        let rooms: HashMap<String, String> = self
            .bookings
            .list_rooms()
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let records: Vec<CourseRecord> = self
            .bookings
            .list_courses()
            .await?
            .into_iter()
            .map(|c| CourseRecord {
                teacher: teachers.get(&c.teacher_id).cloned().unwrap_or(c.teacher_id),
                room: rooms.get(&c.room_id).cloned().unwrap_or(c.room_id),
                name: c.name,
                start_date: c.start_date,
                end_date: c.end_date,
                shift: c.shift,
                weekdays: c.weekdays,
            })
            .collect();

        self.sheet.write_courses(path, &records).await?;
        info!(path = %path.display(), rows = records.len(), "exported courses");
        Ok(records.len())
    }

    /// Read rows from `path` without importing them.
    pub async fn read_sheet(&self, path: &Path) -> Result<Vec<CourseRecord>, DomainError> {
        self.sheet.read_courses(path).await
    }

    /// Resolve and admit one row. Validation failures become `RowOutcome::Invalid`;
    /// store failures are returned as errors.
    pub async fn import_record(&self, record: CourseRecord) -> Result<RowOutcome, DomainError> {
        let CourseRecord {
            name,
            start_date,
            end_date,
            teacher,
            room,
            shift,
            weekdays,
        } = record;
        let teacher_name = teacher.trim();
        let room_name = room.trim();

        let mut new = NewEntities::default();
        let teacher_id = match self.find_teacher(teacher_name).await? {
            Some(t) => t.id,
            None if self.create_missing => {
                new.teacher = Some(teacher_name);
                String::new()
            }
            None => {
                return invalid_or_err(DomainError::UnknownTeacher(teacher_name.to_string()));
            }
        };
        let room_id = match self.find_room(room_name).await? {
            Some(r) => r.id,
            None if self.create_missing => {
                // Sheets carry no capacity column.
                new.room = Some((room_name, IMPORTED_ROOM_CAPACITY));
                String::new()
            }
            None => {
                return invalid_or_err(DomainError::UnknownRoom(room_name.to_string()));
            }
        };
        if new.teacher.is_some() || new.room.is_some() {
            info!(
                teacher = ?new.teacher,
                room = ?new.room.map(|(name, _)| name),
                "row names unknown teacher/room, registering if accepted"
            );
        }

        let draft = CourseDraft {
            name,
            start_date,
            end_date,
            teacher_id,
            room_id,
            shift,
            weekdays,
        };
        match self.bookings.add_course_with(draft, new).await {
            Ok(Admission::Accepted(course)) => Ok(RowOutcome::Imported(course)),
            Ok(Admission::Rejected(conflict)) => Ok(RowOutcome::Conflict(conflict)),
            Err(e) => invalid_or_err(e),
        }
    }

    /// Import every row of `path`. `on_row(total, name)` runs after each row is handled.
    /// A malformed file imports nothing.
    pub async fn import_sheet(
        &self,
        path: &Path,
        mut on_row: impl FnMut(usize, &str),
    ) -> Result<ImportReport, DomainError> {
        let records = self.read_sheet(path).await?;
        let total = records.len();
        let mut report = ImportReport::default();
        for record in records {
            let name = record.name.clone();
            let outcome = self.import_record(record).await?;
            if let RowOutcome::Invalid(reason) = &outcome {
                warn!(row = %name, reason = %reason, "import row invalid");
            }
            report.record(&name, outcome);
            on_row(total, &name);
        }
        info!(
            path = %path.display(),
            imported = report.imported,
            skipped = report.skipped(),
            "import finished"
        );
        Ok(report)
    }

    async fn find_teacher(&self, name: &str) -> Result<Option<Teacher>, DomainError> {
        Ok(self
            .bookings
            .list_teachers()
            .await?
            .into_iter()
            .find(|t| t.name.trim().eq_ignore_ascii_case(name)))
    }

    async fn find_room(&self, name: &str) -> Result<Option<Room>, DomainError> {
        Ok(self
            .bookings
            .list_rooms()
            .await?
            .into_iter()
            .find(|r| r.name.trim().eq_ignore_ascii_case(name)))
    }
}

/// Row-level validation problems are reported per row; infrastructure failures abort the import.
fn invalid_or_err(e: DomainError) -> Result<RowOutcome, DomainError> {
    match e {
        DomainError::Store(_) | DomainError::Sheet(_) | DomainError::Ui(_) => Err(e),
        other => Ok(RowOutcome::Invalid(other.to_string())),
    }
}
