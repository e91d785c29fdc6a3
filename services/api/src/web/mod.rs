//! services/api/src/web/mod.rs
//!
//! The HTTP surface: route table, handlers, and the shared rejection shape.

pub mod auth;
pub mod rest;
pub mod state;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use state::AppState;

/// Every rejected request answers with `{"error": message}`.
pub type Rejection = (StatusCode, Json<Value>);

pub(crate) fn reject(status: StatusCode, message: impl Into<String>) -> Rejection {
    (status, Json(json!({ "error": message.into() })))
}

/// Builds the `/api` router the binary serves and the tests exercise.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/register", post(auth::register_handler))
        .route(
            "/videos",
            get(rest::list_videos_handler).post(rest::add_video_handler),
        )
        .route("/users/{id}/avatar", post(rest::update_avatar_handler))
        .route("/users/{id}/progress", post(rest::save_progress_handler))
        .route("/users/{id}/progress/{vid}", get(rest::get_progress_handler))
        .route(
            "/users/{id}/mistakes",
            get(rest::list_mistakes_handler).post(rest::save_mistake_handler),
        )
        .route(
            "/users/{id}/schedule",
            get(rest::get_schedule_handler).post(rest::save_schedule_handler),
        )
        .route("/users/{id}/stats", get(rest::get_stats_handler))
        .with_state(state)
}
