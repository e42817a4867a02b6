use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use validator::Validate;

use super::service::{AuthResponse, LoginRequest, RegisterRequest};
use crate::account::{AccountProfile, StoreError};
use crate::gateway::types::error_codes;
use crate::gateway::{state::AppState, types::ApiResponse};

/// Register a new account
///
/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = ApiResponse<AccountProfile>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountProfile>>), (StatusCode, Json<ApiResponse<()>>)> {
    if let Err(e) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                e.to_string(),
            )),
        ));
    }

    match state.user_auth.register(req).await {
        Ok(profile) => Ok((StatusCode::CREATED, Json(ApiResponse::success(profile)))),
        Err(e) if matches!(e.downcast_ref::<StoreError>(), Some(StoreError::DuplicateEmail)) => {
            tracing::warn!("Registration attempt for existing email");
            Err((
                StatusCode::CONFLICT,
                Json(ApiResponse::<()>::error(
                    error_codes::INVALID_PARAMETER,
                    "Email already registered",
                )),
            ))
        }
        Err(e) => {
            tracing::error!("Registration failed: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "Registration failed",
                )),
            ))
        }
    }
}

/// Login
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    match state.user_auth.login(req).await {
        Ok(resp) => Ok((StatusCode::OK, Json(ApiResponse::success(resp)))),
        Err(e) => {
            tracing::warn!("Login failed: {:?}", e);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    error_codes::AUTH_FAILED,
                    "Invalid email or password",
                )),
            ))
        }
    }
}
