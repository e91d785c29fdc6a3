//! crates/hitedu_client/src/client.rs
//!
//! The client facade: implements the `StoreService` port by routing every
//! operation through the fallback orchestrator as a (primary, secondary)
//! pair, and owns the persisted session slot. Callers get one surface and
//! cannot tell which backend served them.

use std::sync::Arc;

use async_trait::async_trait;

use hitedu_core::{
    LearningStats, MistakeDraft, MistakeRecord, Role, ScheduleItem, StoreResult, StoreService,
    User, Video, VideoDraft,
};

use crate::adapters::http::{Ack, ProgressPayload};
use crate::adapters::{HttpBackend, LocalBackend};
use crate::config::ClientConfig;
use crate::fallback::with_fallback;
use crate::session::SessionHolder;
use crate::storage::KvStore;

pub struct HitEduClient {
    http: HttpBackend,
    local: LocalBackend,
    session: SessionHolder,
}

impl HitEduClient {
    pub fn new(config: ClientConfig) -> StoreResult<Self> {
        let kv = Arc::new(KvStore::open(&config.data_dir)?);
        Ok(Self {
            http: HttpBackend::new(config.api_base),
            local: LocalBackend::new(kv.clone(), config.simulate_latency),
            session: SessionHolder::new(kv),
        })
    }

    /// The previously persisted session, if any. Restoring it requires no
    /// round trip and no re-authentication.
    pub fn session(&self) -> StoreResult<Option<User>> {
        self.session.current()
    }

    /// Logout is local by design: the backend keeps no session state, so
    /// clearing the slot is the whole operation.
    pub fn logout(&self) -> StoreResult<()> {
        self.session.clear()
    }
}

#[async_trait]
impl StoreService for HitEduClient {
    async fn login(&self, username: &str, password: &str, role: Role) -> StoreResult<User> {
        let user: User = with_fallback(
            || self.http.login(username, password, role),
            || self.local.login(username, password, role),
        )
        .await?;
        self.session.set(&user)?;
        Ok(user)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> StoreResult<User> {
        let user: User = with_fallback(
            || self.http.register(username, password, email, role),
            || self.local.register(username, password, email, role),
        )
        .await?;
        self.session.set(&user)?;
        Ok(user)
    }

    async fn update_avatar(&self, user_id: &str, avatar: &str) -> StoreResult<User> {
        let user: User = with_fallback(
            || self.http.update_avatar(user_id, avatar),
            || self.local.update_avatar(user_id, avatar),
        )
        .await?;
        self.session.set(&user)?;
        Ok(user)
    }

    async fn get_videos(&self) -> StoreResult<Vec<Video>> {
        with_fallback(|| self.http.get_videos(), || self.local.get_videos()).await
    }

    async fn add_video(&self, draft: VideoDraft) -> StoreResult<Video> {
        with_fallback(
            || self.http.add_video(&draft),
            || self.local.add_video(draft.clone()),
        )
        .await
    }

    async fn save_video_progress(
        &self,
        user_id: &str,
        video_id: &str,
        position: f64,
    ) -> StoreResult<()> {
        let _ack: Ack = with_fallback(
            || self.http.save_video_progress(user_id, video_id, position),
            || async {
                self.local
                    .save_video_progress(user_id, video_id, position)
                    .await?;
                Ok(Ack { success: true })
            },
        )
        .await?;
        Ok(())
    }

    async fn get_video_progress(&self, user_id: &str, video_id: &str) -> StoreResult<f64> {
        let payload: ProgressPayload = with_fallback(
            || self.http.get_video_progress(user_id, video_id),
            || async {
                let timestamp = self.local.get_video_progress(user_id, video_id).await?;
                Ok(ProgressPayload { timestamp })
            },
        )
        .await?;
        Ok(payload.timestamp)
    }

    async fn save_mistake(
        &self,
        user_id: &str,
        draft: MistakeDraft,
    ) -> StoreResult<MistakeRecord> {
        with_fallback(
            || self.http.save_mistake(user_id, &draft),
            || self.local.save_mistake(user_id, draft.clone()),
        )
        .await
    }

    async fn get_mistakes(&self, user_id: &str) -> StoreResult<Vec<MistakeRecord>> {
        with_fallback(
            || self.http.get_mistakes(user_id),
            || self.local.get_mistakes(user_id),
        )
        .await
    }

    async fn save_schedule(&self, user_id: &str, items: Vec<ScheduleItem>) -> StoreResult<()> {
        let _ack: Ack = with_fallback(
            || self.http.save_schedule(user_id, &items),
            || async {
                self.local.save_schedule(user_id, items.clone()).await?;
                Ok(Ack { success: true })
            },
        )
        .await?;
        Ok(())
    }

    async fn get_schedule(&self, user_id: &str) -> StoreResult<Vec<ScheduleItem>> {
        with_fallback(
            || self.http.get_schedule(user_id),
            || self.local.get_schedule(user_id),
        )
        .await
    }

    async fn get_user_stats(&self, user_id: &str) -> StoreResult<LearningStats> {
        with_fallback(
            || self.http.get_user_stats(user_id),
            || self.local.get_user_stats(user_id),
        )
        .await
    }
}
