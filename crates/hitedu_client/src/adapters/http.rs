//! crates/hitedu_client/src/adapters/http.rs
//!
//! The primary store adapter: one HTTP request per domain operation
//! against the REST backend. Methods return the raw response, because
//! status handling and JSON decoding belong to the fallback orchestrator,
//! which needs the undecoded outcome to classify failures. The adapter
//! itself holds no state beyond the connection pool.

use hitedu_core::{MistakeDraft, Role, ScheduleItem, VideoDraft};
use reqwest::Response;
use serde::Deserialize;
use serde_json::json;

/// Acknowledgement body the write endpoints answer with.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    #[allow(dead_code)]
    pub success: bool,
}

/// Body of the progress-read endpoint. A never-watched video reads as
/// timestamp 0; the server decides that default, not this adapter.
#[derive(Debug, Deserialize)]
pub(crate) struct ProgressPayload {
    pub timestamp: f64,
}

pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
}

impl HttpBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: api_base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    // --- Auth ---

    pub async fn login(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password, "role": role }))
            .send()
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url("/auth/register"))
            .json(&json!({
                "username": username,
                "password": password,
                "email": email,
                "role": role,
            }))
            .send()
            .await
    }

    pub async fn update_avatar(
        &self,
        user_id: &str,
        avatar: &str,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url(&format!("/users/{}/avatar", user_id)))
            .json(&json!({ "avatar": avatar }))
            .send()
            .await
    }

    // --- Videos ---

    pub async fn get_videos(&self) -> Result<Response, reqwest::Error> {
        self.client.get(self.url("/videos")).send().await
    }

    pub async fn add_video(&self, draft: &VideoDraft) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url("/videos"))
            .json(draft)
            .send()
            .await
    }

    // --- Progress ---

    pub async fn save_video_progress(
        &self,
        user_id: &str,
        video_id: &str,
        position: f64,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url(&format!("/users/{}/progress", user_id)))
            .json(&json!({ "videoId": video_id, "timestamp": position }))
            .send()
            .await
    }

    pub async fn get_video_progress(
        &self,
        user_id: &str,
        video_id: &str,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(&format!("/users/{}/progress/{}", user_id, video_id)))
            .send()
            .await
    }

    // --- Mistakes ---

    pub async fn save_mistake(
        &self,
        user_id: &str,
        draft: &MistakeDraft,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url(&format!("/users/{}/mistakes", user_id)))
            .json(draft)
            .send()
            .await
    }

    pub async fn get_mistakes(&self, user_id: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(&format!("/users/{}/mistakes", user_id)))
            .send()
            .await
    }

    // --- Schedule ---

    pub async fn save_schedule(
        &self,
        user_id: &str,
        items: &[ScheduleItem],
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url(&format!("/users/{}/schedule", user_id)))
            .json(&items)
            .send()
            .await
    }

    pub async fn get_schedule(&self, user_id: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(&format!("/users/{}/schedule", user_id)))
            .send()
            .await
    }

    // --- Analytics ---

    pub async fn get_user_stats(&self, user_id: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(&format!("/users/{}/stats", user_id)))
            .send()
            .await
    }
}
