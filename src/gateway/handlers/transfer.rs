//! Transfer endpoint
//!
//! Translates the engine's error taxonomy into HTTP: validation failures are
//! 400s, source/destination rejections are 422s, a failed compensation is a
//! 500 with its own error code so alerting can key on it, and transient
//! store trouble is a 503.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::gateway::types::{ApiResponse, StrictAmount, error_codes};
use crate::gateway::state::AppState;
use crate::money::from_minor_units;
use crate::transfer::{TransferError, TransferRequest};
use crate::user_auth::Claims;

/// API request for a balance transfer
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferApiRequest {
    /// Source account id (UUID)
    #[schema(example = "8f14e45f-ceea-467f-a0e6-1d49b4e5c001")]
    pub from: String,
    /// Destination account id (UUID)
    #[schema(example = "8f14e45f-ceea-467f-a0e6-1d49b4e5c002")]
    pub to: String,
    /// Amount as a decimal string (floats would drift)
    #[schema(value_type = String, example = "25.00")]
    pub amount: StrictAmount,
}

/// API response for a completed transfer
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferApiResponse {
    pub transfer_id: String,
    #[schema(example = "COMMITTED")]
    pub status: String,
    pub from: String,
    pub to: String,
    #[schema(example = "25.00")]
    pub amount: String,
    /// Completion timestamp (milliseconds)
    pub timestamp: i64,
}

/// Transfer balance between two accounts
///
/// POST /api/v1/users/transfer
#[utoipa::path(
    post,
    path = "/api/v1/users/transfer",
    request_body = TransferApiRequest,
    responses(
        (status = 200, description = "Transfer committed", body = ApiResponse<TransferApiResponse>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Authenticated account is not the source"),
        (status = 422, description = "Transfer rejected (insufficient balance or missing account)"),
        (status = 500, description = "Ledger inconsistency detected"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_jwt" = [])),
    tag = "Transfers"
)]
pub async fn post_transfer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TransferApiRequest>,
) -> Result<Json<ApiResponse<TransferApiResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let amount = req.amount.minor_units().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                e.to_string(),
            )),
        )
    })?;

    let transfer = TransferRequest::parse(&req.from, &req.to, amount)
        .map_err(|e| reject(&e))?;

    // Only the owner of the source account may move its funds
    if claims.account_id() != Some(transfer.from) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error(
                error_codes::FORBIDDEN,
                "Authenticated account is not the transfer source",
            )),
        ));
    }

    match state.engine.transfer(transfer).await {
        Ok(receipt) => Ok(Json(ApiResponse::success(TransferApiResponse {
            transfer_id: receipt.transfer_id.to_string(),
            status: "COMMITTED".to_string(),
            from: receipt.from.to_string(),
            to: receipt.to.to_string(),
            amount: from_minor_units(receipt.amount).to_string(),
            timestamp: receipt.completed_at.timestamp_millis(),
        }))),
        Err(e) => Err(reject(&e)),
    }
}

/// Map a TransferError onto the response envelope
fn reject(err: &TransferError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = match err {
        TransferError::SameAccount
        | TransferError::InvalidAmount
        | TransferError::MalformedAccountId(_) => error_codes::INVALID_PARAMETER,
        TransferError::InsufficientBalance => error_codes::INSUFFICIENT_BALANCE,
        TransferError::SourceNotFound => error_codes::ACCOUNT_NOT_FOUND,
        TransferError::DestinationUnavailable(_) => error_codes::TRANSFER_REJECTED,
        TransferError::CompensationFailed { .. } => error_codes::LEDGER_INCONSISTENT,
        TransferError::StoreUnavailable(_) => error_codes::SERVICE_UNAVAILABLE,
    };

    (status, Json(ApiResponse::<()>::error(code, err.to_string())))
}
