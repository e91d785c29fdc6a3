//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for login and registration.
//!
//! The store layer distinguishes several failure causes; this layer owns
//! the wire messages and deliberately collapses every login miss into one
//! combined response, exactly as clients expect it.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use hitedu_core::{Role, StoreError};

use crate::web::{reject, state::AppState, Rejection};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[schema(value_type = String, example = "student")]
    pub role: Role,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[schema(value_type = String, example = "student")]
    pub role: Role,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Authenticate with username, password and role.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; returns the user without its password"),
        (status = 401, description = "Username, password or role did not match")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, Rejection> {
    match state
        .store
        .login(&req.username, &req.password, req.role)
        .await
    {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            error!("Login rejected for '{}': {}", req.username, e);
            Err(reject(StatusCode::UNAUTHORIZED, "用户名、密码或角色错误"))
        }
    }
}

/// POST /auth/register - Create a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created; returns the user without its password"),
        (status = 400, description = "The (username, role) pair is already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Rejection> {
    match state
        .store
        .register(&req.username, &req.password, &req.email, req.role)
        .await
    {
        Ok(user) => Ok(Json(user)),
        Err(StoreError::DuplicateUser) => Err(reject(StatusCode::BAD_REQUEST, "用户已存在")),
        Err(e) => {
            error!("Failed to register '{}': {}", req.username, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to register user",
            ))
        }
    }
}
