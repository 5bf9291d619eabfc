use axum::{
    Extension, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, SessionUser};
use crate::constants::auth::SESSION_USER_KEY;
use crate::services::AuthError;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a logged-in session and hands the caller to
/// downstream handlers as a request extension.
///
/// Role flags are re-read from the store on every request. A session whose
/// account has been deleted is flushed and answered with 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(remembered) = session_user(&session).await? else {
        return Ok((StatusCode::UNAUTHORIZED, "Unauthorized").into_response());
    };

    let current = match state.auth().get_user(&remembered.username).await {
        Ok(current) => current,
        Err(AuthError::NotFound(_)) => {
            tracing::warn!(username = %remembered.username, "Session for deleted account rejected");
            let _ = session.flush().await;
            return Ok((StatusCode::UNAUTHORIZED, "Unauthorized").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::Span::current().record("username", &current.username);
    request.extensions_mut().insert(SessionUser {
        username: current.username,
        is_admin: current.is_admin,
        is_superadmin: current.is_superadmin,
    });

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Checks credentials and stores the caller's identity in the session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionUser>>, ApiError> {
    let result = state
        .auth()
        .authenticate(&payload.username, &payload.password)
        .await;

    if !result.authenticated {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user = SessionUser {
        username: payload.username,
        is_admin: result.is_admin,
        is_superadmin: result.is_superadmin,
    };

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    session
        .insert(SESSION_USER_KEY, &user)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("User logged in: {}", user.username);

    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
pub async fn get_current_user(
    Extension(user): Extension<SessionUser>,
) -> Json<ApiResponse<SessionUser>> {
    Json(ApiResponse::success(user))
}

// ============================================================================
// Helpers
// ============================================================================

async fn session_user(session: &Session) -> Result<Option<SessionUser>, ApiError> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}
