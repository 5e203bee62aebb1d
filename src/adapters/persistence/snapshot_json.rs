//! Implements BookingStore on top of MemoryStore, mirrored to a JSON file.
//!
//! The whole store is rewritten after every insertion so a later session can resume it.

use crate::adapters::persistence::memory_store::{BookingData, MemoryStore};
use crate::domain::{Course, CourseDraft, DomainError, Room, Teacher};
use crate::ports::BookingStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// JSON snapshot store.
pub struct JsonSnapshotStore {
    path: PathBuf,
    inner: MemoryStore,
    /// Held from snapshot to commit so concurrent writers never lose each other's records.
    save_lock: Mutex<()>,
}

impl JsonSnapshotStore {
    /// Open the snapshot at `path`. A missing file starts an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path).await {
            Ok(s) => serde_json::from_str::<BookingData>(&s)
                .map_err(|e| DomainError::Store(format!("parse {}: {}", path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "no snapshot yet, starting empty");
                BookingData::default()
            }
            Err(e) => return Err(DomainError::Store(format!("read snapshot: {}", e))),
        };
        info!(
            path = %path.display(),
            teachers = data.teachers.len(),
            rooms = data.rooms.len(),
            courses = data.courses.len(),
            "loaded snapshot"
        );
        Ok(Self {
            path,
            inner: MemoryStore::from_data(data),
            save_lock: Mutex::new(()),
        })
    }

    /// Apply `change` to a copy of the store, write the copy, then make it current.
    /// A failed write leaves the in-memory store untouched.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut BookingData) -> T,
    ) -> Result<T, DomainError> {
        let _guard = self.save_lock.lock().await;
        let mut data = self.inner.snapshot().await;
        let out = change(&mut data);
        self.save(&data).await?;
        self.inner.replace(data).await;
        Ok(out)
    }

    /// Atomic save: write temp file, sync_all, rename over the target.
    async fn save(&self, data: &BookingData) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(data).map_err(|e| DomainError::Store(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Store(format!("create snapshot dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Store(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Store(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Store(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Store(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookingStore for JsonSnapshotStore {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, DomainError> {
        self.inner.list_teachers().await
    }

    async fn add_teacher(&self, name: &str) -> Result<Teacher, DomainError> {
        self.commit(|data| data.push_teacher(name)).await
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, DomainError> {
        self.inner.list_rooms().await
    }

    async fn add_room(&self, name: &str, capacity: u32) -> Result<Room, DomainError> {
        self.commit(|data| data.push_room(name, capacity)).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>, DomainError> {
        self.inner.list_courses().await
    }

    async fn add_course(&self, draft: CourseDraft) -> Result<Course, DomainError> {
        self.commit(|data| data.push_course(draft)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Shift, Weekday};
    use chrono::NaiveDate;

    fn temp_snapshot(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("room-booking-{}-{}", tag, uuid::Uuid::new_v4()))
            .join("store.json")
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let path = temp_snapshot("reopen");
        let store = JsonSnapshotStore::open(&path).await.unwrap();
        let teacher = store.add_teacher("Grace").await.unwrap();
        let room = store.add_room("Lab 2", 24).await.unwrap();
        let course = store
            .add_course(CourseDraft {
                name: "Compilers".into(),
                start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
                teacher_id: teacher.id.clone(),
                room_id: room.id.clone(),
                shift: Shift::Afternoon,
                weekdays: [Weekday::Monday, Weekday::Thursday].into_iter().collect(),
            })
            .await
            .unwrap();

        let reopened = JsonSnapshotStore::open(&path).await.unwrap();
        assert_eq!(reopened.list_teachers().await.unwrap(), vec![teacher]);
        assert_eq!(reopened.list_rooms().await.unwrap(), vec![room]);
        assert_eq!(reopened.list_courses().await.unwrap(), vec![course]);
        assert!(!path.with_extension("json.tmp").exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_store_unchanged() {
        let path = temp_snapshot("failed-save");
        let store = JsonSnapshotStore::open(&path).await.unwrap();
        let teacher = store.add_teacher("Grace").await.unwrap();

        // A directory squatting on the temp path makes File::create fail.
        let temp_path = path.with_extension("json.tmp");
        std::fs::create_dir_all(&temp_path).unwrap();

        assert!(matches!(store.add_teacher("Alan").await, Err(DomainError::Store(_))));
        assert!(matches!(
            store.add_room("Lab 2", 24).await,
            Err(DomainError::Store(_))
        ));
        let draft = CourseDraft {
            name: "Compilers".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
            teacher_id: teacher.id.clone(),
            room_id: "r".into(),
            shift: Shift::Morning,
            weekdays: [Weekday::Monday].into_iter().collect(),
        };
        assert!(matches!(store.add_course(draft).await, Err(DomainError::Store(_))));

        assert_eq!(store.list_teachers().await.unwrap(), vec![teacher.clone()]);
        assert!(store.list_rooms().await.unwrap().is_empty());
        assert!(store.list_courses().await.unwrap().is_empty());

        std::fs::remove_dir(&temp_path).unwrap();
        let room = store.add_room("Lab 3", 10).await.unwrap();
        let reopened = JsonSnapshotStore::open(&path).await.unwrap();
        assert_eq!(reopened.list_teachers().await.unwrap(), vec![teacher]);
        assert_eq!(reopened.list_rooms().await.unwrap(), vec![room]);
        assert!(reopened.list_courses().await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_missing_snapshot_starts_empty() {
        let path = temp_snapshot("missing");
        let store = JsonSnapshotStore::open(&path).await.unwrap();
        assert!(store.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let path = temp_snapshot("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonSnapshotStore::open(&path).await,
            Err(DomainError::Store(_))
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
