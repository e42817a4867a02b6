use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::account::models::AccountProfile;
use crate::account::store::AccountQuery;
use crate::account::validation::parse_account_id;
use crate::gateway::types::error_codes;
use crate::gateway::{state::AppState, types::ApiResponse};

/// Get one account by id
///
/// GET /api/v1/users/{id}
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = String, Path, description = "Account id (UUID)")
    ),
    responses(
        (status = 200, description = "Account found", body = ApiResponse<AccountProfile>),
        (status = 400, description = "Malformed account id"),
        (status = 404, description = "Account not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_jwt" = [])),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AccountProfile>>, (StatusCode, Json<ApiResponse<()>>)> {
    let account_id = parse_account_id(&id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                e.to_string(),
            )),
        )
    })?;

    match state.store.get(account_id).await {
        Ok(Some(account)) => Ok(Json(ApiResponse::success(account.profile()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(
                error_codes::ACCOUNT_NOT_FOUND,
                "Account not found",
            )),
        )),
        Err(e) => {
            tracing::error!("Account lookup failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::error(
                    error_codes::SERVICE_UNAVAILABLE,
                    "Store unavailable",
                )),
            ))
        }
    }
}

/// List accounts query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAccountsParams {
    /// Case-insensitive substring filter on name
    pub name: Option<String>,
    /// Case-insensitive substring filter on email
    pub email: Option<String>,
    /// Page number, 1-based (default 1)
    pub page: Option<u32>,
    /// Page size (default 10)
    pub limit: Option<u32>,
}

/// List accounts
///
/// GET /api/v1/users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListAccountsParams),
    responses(
        (status = 200, description = "Accounts matching the filter", body = ApiResponse<Vec<AccountProfile>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_jwt" = [])),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListAccountsParams>,
) -> Result<Json<ApiResponse<Vec<AccountProfile>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let query = AccountQuery {
        name: params.name,
        email: params.email,
        page: params.page.unwrap_or(1),
        limit: params.limit.unwrap_or(10),
    };

    match state.store.list(query).await {
        Ok(accounts) => Ok(Json(ApiResponse::success(
            accounts.iter().map(|a| a.profile()).collect(),
        ))),
        Err(e) => {
            tracing::error!("Account listing failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::error(
                    error_codes::SERVICE_UNAVAILABLE,
                    "Store unavailable",
                )),
            ))
        }
    }
}

/// Count accounts
///
/// GET /api/v1/users/count
#[utoipa::path(
    get,
    path = "/api/v1/users/count",
    responses(
        (status = 200, description = "Total account count", body = ApiResponse<i64>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_jwt" = [])),
    tag = "Accounts"
)]
pub async fn count_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<i64>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.store.count().await {
        Ok(count) => Ok(Json(ApiResponse::success(count))),
        Err(e) => {
            tracing::error!("Account count failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::error(
                    error_codes::SERVICE_UNAVAILABLE,
                    "Store unavailable",
                )),
            ))
        }
    }
}
