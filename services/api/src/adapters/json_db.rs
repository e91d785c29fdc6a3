//! services/api/src/adapters/json_db.rs
//!
//! This module contains the JSON-file store adapter, which is the concrete
//! implementation of the `StoreService` port backing the REST API. The whole
//! database is one JSON document: loaded (or seeded) at startup, held behind
//! a mutex, and rewritten to disk after every mutation.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use hitedu_core::{
    default_avatar, seed, LearningStats, MistakeDraft, MistakeRecord, Role, ScheduleItem,
    StoreError, StoreResult, StoreService, User, UserAccount, Video, VideoDraft, VideoProgress,
};

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

//=========================================================================================
// The On-Disk Document
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct Database {
    users: Vec<UserAccount>,
    videos: Vec<Video>,
    progress: HashMap<String, VideoProgress>,
    mistakes: HashMap<String, Vec<MistakeRecord>>,
    schedules: HashMap<String, Vec<ScheduleItem>>,
}

impl Database {
    /// The initial document: demo accounts and demo videos, everything
    /// else empty.
    fn seeded() -> Self {
        Self {
            users: seed::demo_users(),
            videos: seed::demo_videos(),
            progress: HashMap::new(),
            mistakes: HashMap::new(),
            schedules: HashMap::new(),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed store adapter that implements the `StoreService` port.
pub struct JsonDb {
    path: PathBuf,
    db: Mutex<Database>,
}

impl JsonDb {
    /// Opens the database file, seeding a fresh one when it is missing.
    /// An unreadable document is replaced with the seed rather than
    /// refusing to start, matching the behavior callers rely on.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(db) => {
                    info!("Loaded existing database from {}", path.display());
                    db
                }
                Err(e) => {
                    error!("Error reading DB file ({}), creating a new one.", e);
                    Database::seeded()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No database found, creating {}", path.display());
                Database::seeded()
            }
            Err(e) => return Err(e),
        };

        let store = Self {
            path,
            db: Mutex::new(db),
        };
        // Make sure the file exists from the start.
        {
            let db = store.db.lock().unwrap();
            store.write_to_disk(&db)?;
        }
        Ok(store)
    }

    fn write_to_disk(&self, db: &Database) -> io::Result<()> {
        let text = serde_json::to_string_pretty(db)?;
        fs::write(&self.path, text)
    }

    fn persist(&self, db: &Database) -> StoreResult<()> {
        self.write_to_disk(db)
            .map_err(|e| StoreError::Rejected(format!("failed to save database: {}", e)))
    }
}

//=========================================================================================
// `StoreService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoreService for JsonDb {
    async fn login(&self, username: &str, password: &str, role: Role) -> StoreResult<User> {
        let db = self.db.lock().unwrap();
        db.users
            .iter()
            .find(|u| u.username == username && u.password == password && u.role == role)
            .map(|u| u.to_user())
            .ok_or(StoreError::InvalidCredentials)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> StoreResult<User> {
        let mut db = self.db.lock().unwrap();
        // Same uniqueness contract as the local store: (username, role).
        if db
            .users
            .iter()
            .any(|u| u.username == username && u.role == role)
        {
            return Err(StoreError::DuplicateUser);
        }

        let account = UserAccount {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            role,
            avatar: Some(default_avatar(username, role)),
        };
        db.users.push(account.clone());
        self.persist(&db)?;
        Ok(account.to_user())
    }

    async fn update_avatar(&self, user_id: &str, avatar: &str) -> StoreResult<User> {
        let mut db = self.db.lock().unwrap();
        let index = db
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or(StoreError::UserNotFound)?;
        db.users[index].avatar = Some(avatar.to_string());
        let user = db.users[index].to_user();
        self.persist(&db)?;
        Ok(user)
    }

    async fn get_videos(&self) -> StoreResult<Vec<Video>> {
        Ok(self.db.lock().unwrap().videos.clone())
    }

    async fn add_video(&self, draft: VideoDraft) -> StoreResult<Video> {
        let mut db = self.db.lock().unwrap();
        let video = draft.into_video(Uuid::new_v4().to_string(), now_ms());
        // Newest uploads surface first.
        db.videos.insert(0, video.clone());
        self.persist(&db)?;
        Ok(video)
    }

    async fn save_video_progress(
        &self,
        user_id: &str,
        video_id: &str,
        position: f64,
    ) -> StoreResult<()> {
        let mut db = self.db.lock().unwrap();
        db.progress.insert(
            VideoProgress::key(user_id, video_id),
            VideoProgress {
                video_id: video_id.to_string(),
                timestamp: position,
                completed: false,
                last_updated: now_ms(),
            },
        );
        self.persist(&db)
    }

    async fn get_video_progress(&self, user_id: &str, video_id: &str) -> StoreResult<f64> {
        let db = self.db.lock().unwrap();
        Ok(db
            .progress
            .get(&VideoProgress::key(user_id, video_id))
            .map(|p| p.timestamp)
            .unwrap_or(0.0))
    }

    async fn save_mistake(
        &self,
        user_id: &str,
        draft: MistakeDraft,
    ) -> StoreResult<MistakeRecord> {
        let mut db = self.db.lock().unwrap();
        let record = draft.into_record(Uuid::new_v4().to_string(), now_ms());
        db.mistakes
            .entry(user_id.to_string())
            .or_default()
            .insert(0, record.clone());
        self.persist(&db)?;
        Ok(record)
    }

    async fn get_mistakes(&self, user_id: &str) -> StoreResult<Vec<MistakeRecord>> {
        let db = self.db.lock().unwrap();
        Ok(db.mistakes.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_schedule(&self, user_id: &str, items: Vec<ScheduleItem>) -> StoreResult<()> {
        let mut db = self.db.lock().unwrap();
        db.schedules.insert(user_id.to_string(), items);
        self.persist(&db)
    }

    async fn get_schedule(&self, user_id: &str) -> StoreResult<Vec<ScheduleItem>> {
        let db = self.db.lock().unwrap();
        Ok(db.schedules.get(user_id).cloned().unwrap_or_default())
    }

    async fn get_user_stats(&self, _user_id: &str) -> StoreResult<LearningStats> {
        Ok(seed::random_stats())
    }
}
