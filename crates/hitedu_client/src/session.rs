//! crates/hitedu_client/src/session.rs
//!
//! The single-slot current-session holder.
//!
//! Lifecycle: absent until a login or registration succeeds, then set to
//! the returned user; cleared on logout; read on startup to restore the
//! previous session without re-authenticating. There is no expiry and no
//! refresh: the slot is trusted until explicitly cleared.

use std::sync::Arc;

use hitedu_core::{StoreResult, User};

use crate::storage::{KvStore, SESSION_KEY};

/// Process-wide current-user record, persisted as one JSON slot in the
/// same key-value store the local backend uses.
#[derive(Clone)]
pub struct SessionHolder {
    kv: Arc<KvStore>,
}

impl SessionHolder {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// The persisted session, if any.
    pub fn current(&self) -> StoreResult<Option<User>> {
        self.kv.get(SESSION_KEY)
    }

    pub fn set(&self, user: &User) -> StoreResult<()> {
        self.kv.set(SESSION_KEY, user)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove(SESSION_KEY)
    }
}
