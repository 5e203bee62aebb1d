//! Booking use case: validate a proposal -> check availability -> persist.
//!
//! - Validation rejects empty names, reversed date ranges, empty weekday sets and unknown ids
//! - Check and insert run under one admission lock, so a rejected proposal never touches the store
//! - Teachers and rooms introduced by a course are registered only once it is accepted
//! - Conflicts come back as `Admission::Rejected`, not as errors

use crate::domain::{
    Availability, Conflict, Course, CourseDraft, DomainError, Room, Teacher, check_availability,
};
use crate::ports::BookingStore;
use crate::shared::config::DEFAULT_ENDING_SOON_DAYS;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Result of `add_course`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted(Course),
    Rejected(Conflict),
}

/// Teacher and room to register together with a course, for names not stored yet.
/// They are created only if the course is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewEntities<'a> {
    pub teacher: Option<&'a str>,
    /// Name and capacity.
    pub room: Option<(&'a str, u32)>,
}

/// Stands in for the id of a teacher or room that is not registered yet.
/// Store ids are never empty, so it matches no existing course.
const PENDING_ID: &str = "";

/// Booking service. Owns the check-then-insert step.
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    admission: Mutex<()>,
    ending_soon_days: i64,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            store,
            admission: Mutex::new(()),
            ending_soon_days: DEFAULT_ENDING_SOON_DAYS,
        }
    }

    /// Override the ending-soon window used by `courses_ending_soon`.
    pub fn with_ending_soon_days(mut self, days: i64) -> Self {
        self.ending_soon_days = days;
        self
    }

    pub fn ending_soon_days(&self) -> i64 {
        self.ending_soon_days
    }

    pub async fn add_teacher(&self, name: &str) -> Result<Teacher, DomainError> {
        let name = non_empty(name)?;
        let teacher = self.store.add_teacher(name).await?;
        info!(teacher_id = %teacher.id, name, "teacher added");
        Ok(teacher)
    }

    pub async fn add_room(&self, name: &str, capacity: u32) -> Result<Room, DomainError> {
        let name = non_empty(name)?;
        let capacity = positive(capacity)?;
        let room = self.store.add_room(name, capacity).await?;
        info!(room_id = %room.id, name, capacity, "room added");
        Ok(room)
    }

    /// Validate and dry-run the availability check without storing anything.
    pub async fn check_course(&self, draft: &CourseDraft) -> Result<Availability, DomainError> {
        validate_shape(draft)?;
        self.validate_refs(draft, NewEntities::default()).await?;
        let existing = self.store.list_courses().await?;
        Ok(check_availability(draft, &existing))
    }

    /// Add a course if it does not double-book its teacher or room.
    pub async fn add_course(&self, draft: CourseDraft) -> Result<Admission, DomainError> {
        self.add_course_with(draft, NewEntities::default()).await
    }

    /// Like `add_course`, but the teacher and/or room may be new. The draft's id for a
    /// new entity is ignored. Nothing is registered unless the course is accepted.
    pub async fn add_course_with(
        &self,
        mut draft: CourseDraft,
        new: NewEntities<'_>,
    ) -> Result<Admission, DomainError> {
        draft.name = non_empty(&draft.name)?.to_string();
        validate_shape(&draft)?;
        let new_teacher = new.teacher.map(non_empty).transpose()?;
        let new_room = match new.room {
            Some((name, capacity)) => Some((non_empty(name)?, positive(capacity)?)),
            None => None,
        };
        if new_teacher.is_some() {
            draft.teacher_id = PENDING_ID.to_string();
        }
        if new_room.is_some() {
            draft.room_id = PENDING_ID.to_string();
        }

        let _guard = self.admission.lock().await;
        self.validate_refs(&draft, new).await?;
        let existing = self.store.list_courses().await?;
        match check_availability(&draft, &existing) {
            Availability::Available => {
                if let Some(name) = new_teacher {
                    draft.teacher_id = self.add_teacher(name).await?.id;
                }
                if let Some((name, capacity)) = new_room {
                    draft.room_id = self.add_room(name, capacity).await?.id;
                }
                let course = self.store.add_course(draft).await?;
                info!(
                    course_id = %course.id,
                    name = %course.name,
                    shift = %course.shift,
                    "course booked"
                );
                Ok(Admission::Accepted(course))
            }
            Availability::Conflict(conflict) => {
                warn!(
                    name = %draft.name,
                    conflicting_id = %conflict.course_id,
                    shared = %conflict.shared,
                    "course rejected: scheduling conflict"
                );
                Ok(Admission::Rejected(conflict))
            }
        }
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, DomainError> {
        self.store.list_courses().await
    }

    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, DomainError> {
        self.store.list_teachers().await
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, DomainError> {
        self.store.list_rooms().await
    }

    /// Courses whose last day falls within the ending-soon window from `today`.
    pub async fn courses_ending_soon(&self, today: NaiveDate) -> Result<Vec<Course>, DomainError> {
        let mut courses = self.store.list_courses().await?;
        courses.retain(|c| c.is_ending_soon(today, self.ending_soon_days));
        courses.sort_by_key(|c| c.end_date);
        Ok(courses)
    }

    /// Entities named in `pending` are skipped; they are registered on acceptance.
    async fn validate_refs(
        &self,
        draft: &CourseDraft,
        pending: NewEntities<'_>,
    ) -> Result<(), DomainError> {
        if pending.teacher.is_none() {
            let teachers = self.store.list_teachers().await?;
            if !teachers.iter().any(|t| t.id == draft.teacher_id) {
                return Err(DomainError::UnknownTeacher(draft.teacher_id.clone()));
            }
        }
        if pending.room.is_none() {
            let rooms = self.store.list_rooms().await?;
            if !rooms.iter().any(|r| r.id == draft.room_id) {
                return Err(DomainError::UnknownRoom(draft.room_id.clone()));
            }
        }
        Ok(())
    }
}

fn validate_shape(draft: &CourseDraft) -> Result<(), DomainError> {
    non_empty(&draft.name)?;
    if !draft.dates().is_valid() {
        return Err(DomainError::InvalidDateRange {
            start: draft.start_date,
            end: draft.end_date,
        });
    }
    if draft.weekdays.is_empty() {
        return Err(DomainError::NoWeekdays);
    }
    Ok(())
}

fn positive(capacity: u32) -> Result<u32, DomainError> {
    if capacity == 0 {
        Err(DomainError::InvalidCapacity)
    } else {
        Ok(capacity)
    }
}

fn non_empty(name: &str) -> Result<&str, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(DomainError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::MemoryStore;
    use crate::domain::{SharedResource, Shift, Weekday};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        service: BookingService,
        t1: Teacher,
        t2: Teacher,
        r1: Room,
        r2: Room,
    }

    async fn fixture() -> Fixture {
        let service = BookingService::new(Arc::new(MemoryStore::new()));
        let t1 = service.add_teacher("T1").await.unwrap();
        let t2 = service.add_teacher("T2").await.unwrap();
        let r1 = service.add_room("R1", 30).await.unwrap();
        let r2 = service.add_room("R2", 12).await.unwrap();
        Fixture {
            service,
            t1,
            t2,
            r1,
            r2,
        }
    }

    fn draft(
        name: &str,
        range: (&str, &str),
        teacher: &Teacher,
        room: &Room,
        shift: Shift,
        weekdays: &[Weekday],
    ) -> CourseDraft {
        CourseDraft {
            name: name.into(),
            start_date: date(range.0),
            end_date: date(range.1),
            teacher_id: teacher.id.clone(),
            room_id: room.id.clone(),
            shift,
            weekdays: weekdays.iter().copied().collect(),
        }
    }

    #[tokio::test]
    async fn test_teacher_rejected_in_other_room_and_nothing_stored() {
        let f = fixture().await;
        let first = draft(
            "Semester",
            ("2024-01-01", "2024-06-01"),
            &f.t1,
            &f.r1,
            Shift::Morning,
            &[Weekday::Monday, Weekday::Wednesday],
        );
        let Admission::Accepted(stored) = f.service.add_course(first).await.unwrap() else {
            panic!("first course should be accepted");
        };

        let second = draft(
            "Workshop",
            ("2024-03-01", "2024-03-15"),
            &f.t1,
            &f.r2,
            Shift::Morning,
            &[Weekday::Wednesday],
        );
        match f.service.add_course(second).await.unwrap() {
            Admission::Rejected(c) => {
                assert_eq!(c.course_id, stored.id);
                assert_eq!(c.shared, SharedResource::Teacher);
            }
            Admission::Accepted(_) => panic!("expected rejection"),
        }
        assert_eq!(f.service.list_courses().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_other_shift_is_accepted() {
        let f = fixture().await;
        let jan = ("2024-01-01", "2024-02-01");
        let friday = [Weekday::Friday];
        let morning = draft("A", jan, &f.t1, &f.r1, Shift::Morning, &friday);
        let evening = draft("B", jan, &f.t1, &f.r1, Shift::Evening, &friday);
        assert!(matches!(
            f.service.add_course(morning).await.unwrap(),
            Admission::Accepted(_)
        ));
        assert!(matches!(
            f.service.add_course(evening).await.unwrap(),
            Admission::Accepted(_)
        ));
        assert_eq!(f.service.list_courses().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_check_course_does_not_store() {
        let f = fixture().await;
        let jan = ("2024-01-01", "2024-02-01");
        let d = draft("A", jan, &f.t2, &f.r2, Shift::Afternoon, &[Weekday::Monday]);
        let availability = f.service.check_course(&d).await.unwrap();
        assert!(availability.is_available());
        assert!(f.service.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let f = fixture().await;
        let jan = ("2024-01-01", "2024-02-01");
        let base = draft("A", jan, &f.t1, &f.r1, Shift::Morning, &[Weekday::Monday]);

        let mut reversed = base.clone();
        reversed.start_date = date("2024-03-01");
        assert!(matches!(
            f.service.add_course(reversed).await,
            Err(DomainError::InvalidDateRange { .. })
        ));

        let mut no_days = base.clone();
        no_days.weekdays.clear();
        assert!(matches!(
            f.service.add_course(no_days).await,
            Err(DomainError::NoWeekdays)
        ));

        let mut blank = base.clone();
        blank.name = "   ".into();
        assert!(matches!(
            f.service.add_course(blank).await,
            Err(DomainError::EmptyName)
        ));

        let mut ghost_teacher = base.clone();
        ghost_teacher.teacher_id = "nobody".into();
        assert!(matches!(
            f.service.add_course(ghost_teacher).await,
            Err(DomainError::UnknownTeacher(_))
        ));

        let mut ghost_room = base;
        ghost_room.room_id = "".into();
        assert!(matches!(
            f.service.add_course(ghost_room).await,
            Err(DomainError::UnknownRoom(_))
        ));

        assert!(f.service.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teacher_and_room_validation() {
        let service = BookingService::new(Arc::new(MemoryStore::new()));
        assert!(matches!(service.add_teacher(" ").await, Err(DomainError::EmptyName)));
        assert!(matches!(
            service.add_room("Lab", 0).await,
            Err(DomainError::InvalidCapacity)
        ));
        let room = service.add_room("  Lab  ", 5).await.unwrap();
        assert_eq!(room.name, "Lab");
    }

    #[tokio::test]
    async fn test_new_entities_registered_only_on_acceptance() {
        let f = fixture().await;
        let jan = ("2024-01-01", "2024-02-01");
        let monday = [Weekday::Monday];
        let held = draft("Held", jan, &f.t1, &f.r1, Shift::Morning, &monday);
        assert!(matches!(
            f.service.add_course(held).await.unwrap(),
            Admission::Accepted(_)
        ));

        // New teacher, existing room R1 on the same slot: rejected.
        let clash = draft("Clash", jan, &f.t2, &f.r1, Shift::Morning, &monday);
        let new_teacher = NewEntities {
            teacher: Some("Bob"),
            room: None,
        };
        assert!(matches!(
            f.service.add_course_with(clash, new_teacher).await.unwrap(),
            Admission::Rejected(_)
        ));

        // New teacher and room, reversed dates: invalid.
        let reversed = ("2024-05-01", "2024-04-01");
        let backwards = draft("Back", reversed, &f.t2, &f.r2, Shift::Morning, &monday);
        let both = NewEntities {
            teacher: Some("Cy"),
            room: Some(("Annex", 1)),
        };
        assert!(matches!(
            f.service.add_course_with(backwards, both).await,
            Err(DomainError::InvalidDateRange { .. })
        ));

        let teachers = f.service.list_teachers().await.unwrap();
        assert_eq!(teachers, vec![f.t1.clone(), f.t2.clone()]);
        assert_eq!(f.service.list_rooms().await.unwrap().len(), 2);
        assert_eq!(f.service.list_courses().await.unwrap().len(), 1);

        // Same new teacher and room in a free slot: both registered, course uses their ids.
        let free = draft("Free", jan, &f.t2, &f.r2, Shift::Evening, &monday);
        let admission = f.service.add_course_with(free, both).await.unwrap();
        let Admission::Accepted(course) = admission else {
            panic!("expected acceptance");
        };
        let cy = f.service.list_teachers().await.unwrap().pop().unwrap();
        let annex = f.service.list_rooms().await.unwrap().pop().unwrap();
        assert_eq!(cy.name, "Cy");
        assert_eq!((annex.name.as_str(), annex.capacity), ("Annex", 1));
        assert_eq!(course.teacher_id, cy.id);
        assert_eq!(course.room_id, annex.id);
    }

    #[tokio::test]
    async fn test_courses_ending_soon() {
        let f = fixture().await;
        let service = f.service.with_ending_soon_days(7);
        let monday = [Weekday::Monday];
        let to_march = ("2024-01-01", "2024-03-05");
        let to_april = ("2024-01-01", "2024-04-30");
        let to_feb = ("2024-01-01", "2024-02-28");
        let soon = draft("Soon", to_march, &f.t1, &f.r1, Shift::Morning, &monday);
        let later = draft("Later", to_april, &f.t2, &f.r2, Shift::Morning, &monday);
        let done = draft("Done", to_feb, &f.t1, &f.r1, Shift::Evening, &monday);
        for draft in [soon, later, done] {
            assert!(matches!(
                service.add_course(draft).await.unwrap(),
                Admission::Accepted(_)
            ));
        }
        let ending = service.courses_ending_soon(date("2024-03-01")).await.unwrap();
        let names: Vec<_> = ending.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Soon"]);
    }

    #[tokio::test]
    async fn test_concurrent_admissions_never_double_book() {
        let f = fixture().await;
        let service = Arc::new(f.service);
        let mut handles = Vec::new();
        for i in 0..8 {
            let service = Arc::clone(&service);
            let d = draft(
                &format!("Race {i}"),
                ("2024-05-01", "2024-05-31"),
                &f.t1,
                &f.r1,
                Shift::Afternoon,
                &[Weekday::Tuesday],
            );
            handles.push(tokio::spawn(async move { service.add_course(d).await }));
        }
        let mut accepted = 0;
        for h in handles {
            if let Admission::Accepted(_) = h.await.unwrap().unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(service.list_courses().await.unwrap().len(), 1);
    }
}
