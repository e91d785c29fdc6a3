//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

use hitedu_core::{MistakeDraft, ScheduleItem, StoreError, VideoDraft};

use crate::web::{reject, state::AppState, Rejection};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::login_handler,
        crate::web::auth::register_handler,
        update_avatar_handler,
        list_videos_handler,
        add_video_handler,
        save_progress_handler,
        get_progress_handler,
        save_mistake_handler,
        list_mistakes_handler,
        save_schedule_handler,
        get_schedule_handler,
        get_stats_handler,
    ),
    components(schemas(
        crate::web::auth::LoginRequest,
        crate::web::auth::RegisterRequest,
        AvatarRequest,
        ProgressRequest,
        ProgressResponse,
        AckResponse
    )),
    tags(
        (name = "HitEdu API", description = "JSON-file backed REST API for the education platform.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct AvatarRequest {
    pub avatar: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub video_id: String,
    /// Playback position in seconds.
    pub timestamp: f64,
}

/// The body answered on progress reads; 0 for a never-watched video.
#[derive(Serialize, ToSchema)]
pub struct ProgressResponse {
    pub timestamp: f64,
}

/// Acknowledgement body the write endpoints answer with.
#[derive(Serialize, ToSchema)]
pub struct AckResponse {
    pub success: bool,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// POST /users/{id}/avatar - Replace a user's avatar.
#[utoipa::path(
    post,
    path = "/api/users/{id}/avatar",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Updated user returned, without its password"),
        (status = 404, description = "User not found")
    ),
    params(("id" = String, Path, description = "The user's id"))
)]
pub async fn update_avatar_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AvatarRequest>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.update_avatar(&id, &req.avatar).await {
        Ok(user) => Ok(Json(user)),
        Err(StoreError::UserNotFound) => Err(reject(StatusCode::NOT_FOUND, "User not found")),
        Err(e) => {
            error!("Failed to update avatar for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update avatar",
            ))
        }
    }
}

/// GET /videos - List all videos, newest uploads first.
#[utoipa::path(
    get,
    path = "/api/videos",
    responses((status = 200, description = "All videos"))
)]
pub async fn list_videos_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.get_videos().await {
        Ok(videos) => Ok(Json(videos)),
        Err(e) => {
            error!("Failed to list videos: {}", e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list videos",
            ))
        }
    }
}

/// POST /videos - Store a new video; the id and upload date are assigned here.
#[utoipa::path(
    post,
    path = "/api/videos",
    request_body(description = "The video fields minus id and upload date", content_type = "application/json"),
    responses((status = 200, description = "The stored video"))
)]
pub async fn add_video_handler(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<VideoDraft>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.add_video(draft).await {
        Ok(video) => Ok(Json(video)),
        Err(e) => {
            error!("Failed to add video: {}", e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to add video",
            ))
        }
    }
}

/// POST /users/{id}/progress - Upsert playback progress for one video.
#[utoipa::path(
    post,
    path = "/api/users/{id}/progress",
    request_body = ProgressRequest,
    responses((status = 200, description = "Progress stored", body = AckResponse)),
    params(("id" = String, Path, description = "The user's id"))
)]
pub async fn save_progress_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ProgressRequest>,
) -> Result<impl IntoResponse, Rejection> {
    match state
        .store
        .save_video_progress(&id, &req.video_id, req.timestamp)
        .await
    {
        Ok(()) => Ok(Json(AckResponse { success: true })),
        Err(e) => {
            error!("Failed to save progress for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save progress",
            ))
        }
    }
}

/// GET /users/{id}/progress/{vid} - Read playback progress for one video.
#[utoipa::path(
    get,
    path = "/api/users/{id}/progress/{vid}",
    responses((status = 200, description = "Last watched position", body = ProgressResponse)),
    params(
        ("id" = String, Path, description = "The user's id"),
        ("vid" = String, Path, description = "The video's id")
    )
)]
pub async fn get_progress_handler(
    State(state): State<Arc<AppState>>,
    Path((id, vid)): Path<(String, String)>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.get_video_progress(&id, &vid).await {
        Ok(timestamp) => Ok(Json(ProgressResponse { timestamp })),
        Err(e) => {
            error!("Failed to read progress for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read progress",
            ))
        }
    }
}

/// POST /users/{id}/mistakes - Record a mistake at the head of the user's list.
#[utoipa::path(
    post,
    path = "/api/users/{id}/mistakes",
    request_body(description = "The mistake fields minus id and timestamp", content_type = "application/json"),
    responses((status = 200, description = "The stored mistake record")),
    params(("id" = String, Path, description = "The user's id"))
)]
pub async fn save_mistake_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<MistakeDraft>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.save_mistake(&id, draft).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => {
            error!("Failed to save mistake for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save mistake",
            ))
        }
    }
}

/// GET /users/{id}/mistakes - The user's mistakes, newest first.
#[utoipa::path(
    get,
    path = "/api/users/{id}/mistakes",
    responses((status = 200, description = "Mistake records, newest first")),
    params(("id" = String, Path, description = "The user's id"))
)]
pub async fn list_mistakes_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.get_mistakes(&id).await {
        Ok(mistakes) => Ok(Json(mistakes)),
        Err(e) => {
            error!("Failed to list mistakes for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list mistakes",
            ))
        }
    }
}

/// POST /users/{id}/schedule - Replace the user's entire schedule.
#[utoipa::path(
    post,
    path = "/api/users/{id}/schedule",
    request_body(description = "The full schedule list", content_type = "application/json"),
    responses((status = 200, description = "Schedule stored", body = AckResponse)),
    params(("id" = String, Path, description = "The user's id"))
)]
pub async fn save_schedule_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(items): Json<Vec<ScheduleItem>>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.save_schedule(&id, items).await {
        Ok(()) => Ok(Json(AckResponse { success: true })),
        Err(e) => {
            error!("Failed to save schedule for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save schedule",
            ))
        }
    }
}

/// GET /users/{id}/schedule - The user's schedule.
#[utoipa::path(
    get,
    path = "/api/users/{id}/schedule",
    responses((status = 200, description = "The stored schedule, empty when never saved")),
    params(("id" = String, Path, description = "The user's id"))
)]
pub async fn get_schedule_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.get_schedule(&id).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            error!("Failed to read schedule for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read schedule",
            ))
        }
    }
}

/// GET /users/{id}/stats - Mock learning analytics, regenerated per read.
#[utoipa::path(
    get,
    path = "/api/users/{id}/stats",
    responses((status = 200, description = "Aggregate learning statistics")),
    params(("id" = String, Path, description = "The user's id"))
)]
pub async fn get_stats_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    match state.store.get_user_stats(&id).await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            error!("Failed to compute stats for '{}': {}", id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to compute stats",
            ))
        }
    }
}
