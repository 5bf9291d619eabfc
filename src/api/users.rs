//! User management endpoints.
//!
//! Admins may list users, create plain users and reset passwords. Granting
//! role flags and deleting accounts is reserved for super admins.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SessionUser, UserDto};
use crate::services::{ActionOutcome, AuthError, CreateUser};

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub new_password: String,
}

fn require_admin(user: &SessionUser) -> Result<(), ApiError> {
    if user.can_manage_users() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin privileges required"))
    }
}

fn require_superadmin(user: &SessionUser) -> Result<(), ApiError> {
    if user.is_superadmin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Super admin privileges required"))
    }
}

fn respond(
    result: Result<(), AuthError>,
    success_message: &str,
) -> Result<Json<ApiResponse<ActionOutcome>>, ApiError> {
    let outcome = ActionOutcome::from_result(&result, success_message);
    result?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<SessionUser>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    require_admin(&actor)?;

    let users = state.auth().list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<SessionUser>,
    Json(payload): Json<CreateUser>,
) -> Result<Json<ApiResponse<ActionOutcome>>, ApiError> {
    require_admin(&actor)?;

    if payload.is_admin || payload.is_superadmin {
        require_superadmin(&actor)?;
    }

    let username = payload.username.clone();
    let result = state.auth().create_user(payload).await;
    if result.is_ok() {
        tracing::info!("User {} created by {}", username, actor.username);
    }

    respond(result, "User created successfully")
}

/// PUT /users/{username}/password
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<SessionUser>,
    Path(username): Path<String>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<ApiResponse<ActionOutcome>>, ApiError> {
    require_admin(&actor)?;

    let result = state
        .auth()
        .update_password(&username, &payload.new_password)
        .await;

    respond(result, "Password updated successfully")
}

/// DELETE /users/{username}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<SessionUser>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<ActionOutcome>>, ApiError> {
    require_superadmin(&actor)?;

    let result = state.auth().delete_user_as(&actor.username, &username).await;

    respond(result, "User deleted successfully")
}
