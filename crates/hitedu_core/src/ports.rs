//! crates/hitedu_core/src/ports.rs
//!
//! Defines the service contract (trait) shared by every store backend.
//! The trait forms the boundary of the hexagonal architecture: the HTTP
//! backend, the local file backend, and the fallback client that composes
//! the two all expose this one interface, so callers cannot tell which
//! store ultimately served a request.

use async_trait::async_trait;

use crate::domain::{
    LearningStats, MistakeDraft, MistakeRecord, Role, ScheduleItem, User, Video, VideoDraft,
};

//=========================================================================================
// Store Error and Result Types
//=========================================================================================

/// The error type for all store operations.
///
/// The variants split into two families, and the split is the load-bearing
/// contract of the whole subsystem: `Unreachable` means the request never
/// completed a round trip and is the only condition under which a caller
/// may re-route to another backend. Every other variant means a backend
/// processed the request and said no; those must surface to the caller
/// unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend received the request and rejected it; carries the
    /// server-supplied message verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Login with a username/password pair that matches no account.
    #[error("用户名或密码错误")]
    InvalidCredentials,

    /// Login with a credential pair that exists, but under a different
    /// role than the one selected.
    #[error("该账号不能以{}身份登录", .0.label())]
    RoleMismatch(Role),

    /// Registration under a (username, role) pair that is already taken.
    #[error("该角色下的用户名已存在")]
    DuplicateUser,

    /// Avatar update for an id no account carries.
    #[error("User not found")]
    UserNotFound,

    /// A response arrived but its body was not the expected JSON. A
    /// reachable-but-broken server is a server problem, not an
    /// availability problem, so this does not permit fallback.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The request never reached a server (connection refused, DNS
    /// failure, offline). The only transport-classified variant.
    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

impl StoreError {
    /// True exactly when the failure happened before any server produced
    /// a response, which is the precondition for falling back.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Unreachable(_))
    }
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Store Port (Trait)
//=========================================================================================

#[async_trait]
pub trait StoreService: Send + Sync {
    // --- Auth ---
    async fn login(&self, username: &str, password: &str, role: Role) -> StoreResult<User>;

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> StoreResult<User>;

    async fn update_avatar(&self, user_id: &str, avatar: &str) -> StoreResult<User>;

    // --- Videos ---
    async fn get_videos(&self) -> StoreResult<Vec<Video>>;

    async fn add_video(&self, draft: VideoDraft) -> StoreResult<Video>;

    // --- Playback progress ---
    async fn save_video_progress(
        &self,
        user_id: &str,
        video_id: &str,
        position: f64,
    ) -> StoreResult<()>;

    /// Returns 0.0 for a video the user has never watched; a missing
    /// record is a defined default, not an error.
    async fn get_video_progress(&self, user_id: &str, video_id: &str) -> StoreResult<f64>;

    // --- Mistake book ---
    async fn save_mistake(
        &self,
        user_id: &str,
        draft: MistakeDraft,
    ) -> StoreResult<MistakeRecord>;

    /// Newest first.
    async fn get_mistakes(&self, user_id: &str) -> StoreResult<Vec<MistakeRecord>>;

    // --- Schedule ---
    /// Replaces the user's entire schedule; this is not a merge.
    async fn save_schedule(&self, user_id: &str, items: Vec<ScheduleItem>) -> StoreResult<()>;

    async fn get_schedule(&self, user_id: &str) -> StoreResult<Vec<ScheduleItem>>;

    // --- Analytics ---
    async fn get_user_stats(&self, user_id: &str) -> StoreResult<LearningStats>;
}
