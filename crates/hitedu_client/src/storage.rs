//! crates/hitedu_client/src/storage.rs
//!
//! The persistent key-value mechanism behind the local fallback store:
//! one JSON text file per logical key inside a data directory. The reads
//! and writes themselves are synchronous (the records are tiny); the
//! asynchronous feel of the store comes from the simulated latency layered
//! on top by the adapter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use hitedu_core::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Logical keys, mirroring the collections the platform persists.
pub(crate) const USERS_KEY: &str = "hitedu_users";
pub(crate) const SESSION_KEY: &str = "hitedu_session";
pub(crate) const VIDEOS_KEY: &str = "hitedu_videos";
pub(crate) const MISTAKES_KEY: &str = "hitedu_mistakes";
pub(crate) const SCHEDULE_KEY: &str = "hitedu_schedule";
pub(crate) const PROGRESS_KEY: &str = "hitedu_progress";

/// A directory of JSON blobs addressed by key.
///
/// Individual reads and writes are serialized behind a mutex; a full
/// read-modify-write cycle is not. Two racing operations on the same key
/// resolve last-write-wins, which is acceptable for the intended
/// single-user deployment.
pub struct KvStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl KvStore {
    /// Opens (creating if needed) the store directory.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Rejected(format!("cannot create local store directory: {}", e))
        })?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Whether the key has ever been written. Seeding keys off this, so
    /// an explicitly stored empty collection is not re-seeded.
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let _guard = self.lock.lock().unwrap();
        let text = match fs::read_to_string(self.path_for(key)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Rejected(format!(
                    "local store read failed for '{}': {}",
                    key, e
                )))
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Decode(format!("corrupt local record '{}': {}", key, e)))
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap();
        let text = serde_json::to_string(value)
            .map_err(|e| StoreError::Rejected(format!("cannot serialize '{}': {}", key, e)))?;
        fs::write(self.path_for(key), text).map_err(|e| {
            StoreError::Rejected(format!("local store write failed for '{}': {}", key, e))
        })
    }

    pub fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap();
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Rejected(format!(
                "local store remove failed for '{}': {}",
                key, e
            ))),
        }
    }
}
