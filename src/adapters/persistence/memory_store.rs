//! Implements BookingStore in process memory.
//!
//! Collections live behind a tokio RwLock; identifiers are UUID v4 strings minted at insertion.

use crate::domain::{Course, CourseDraft, DomainError, Room, Teacher};
use crate::ports::BookingStore;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Everything the store holds. Also the on-disk snapshot layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingData {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

fn next_id() -> String {
    Uuid::new_v4().to_string()
}

impl BookingData {
    pub fn push_teacher(&mut self, name: &str) -> Teacher {
        let teacher = Teacher {
            id: next_id(),
            name: name.to_string(),
        };
        self.teachers.push(teacher.clone());
        teacher
    }

    pub fn push_room(&mut self, name: &str, capacity: u32) -> Room {
        let room = Room {
            id: next_id(),
            name: name.to_string(),
            capacity,
        };
        self.rooms.push(room.clone());
        room
    }

    pub fn push_course(&mut self, draft: CourseDraft) -> Course {
        let course = Course::from_draft(next_id(), draft);
        self.courses.push(course.clone());
        course
    }
}

/// In-memory store. Contents last for the session only.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<BookingData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with previously saved contents.
    pub fn from_data(data: BookingData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Clone of the current contents.
    pub async fn snapshot(&self) -> BookingData {
        self.data.read().await.clone()
    }

    /// Swap in new contents wholesale.
    pub async fn replace(&self, data: BookingData) {
        *self.data.write().await = data;
    }
}

#[async_trait::async_trait]
impl BookingStore for MemoryStore {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, DomainError> {
        Ok(self.data.read().await.teachers.clone())
    }

    async fn add_teacher(&self, name: &str) -> Result<Teacher, DomainError> {
        Ok(self.data.write().await.push_teacher(name))
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, DomainError> {
        Ok(self.data.read().await.rooms.clone())
    }

    async fn add_room(&self, name: &str, capacity: u32) -> Result<Room, DomainError> {
        Ok(self.data.write().await.push_room(name, capacity))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, DomainError> {
        Ok(self.data.read().await.courses.clone())
    }

    async fn add_course(&self, draft: CourseDraft) -> Result<Course, DomainError> {
        Ok(self.data.write().await.push_course(draft))
    }
}
