//! Transfer error taxonomy
//!
//! Every failure a transfer can surface, grouped by what it means for the
//! ledger: validation failures and source rejections happened before any
//! mutation; `DestinationUnavailable` means the debit was rolled back;
//! `CompensationFailed` means the rollback itself failed and the books no
//! longer balance. The last one must never be coalesced with the others.

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Validation (nothing touched the store) ===
    #[error("Source and destination account cannot be the same")]
    SameAccount,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Malformed account id: {0}")]
    MalformedAccountId(String),

    // === Source rejection (no mutation occurred) ===
    #[error("Source account not found")]
    SourceNotFound,

    #[error("Insufficient balance")]
    InsufficientBalance,

    // === Credit failure, debit rolled back ===
    #[error("Destination unavailable, transfer rolled back: {0}")]
    DestinationUnavailable(String),

    // === Credit failure AND rollback failure: ledger inconsistency ===
    #[error(
        "Compensation failed: account {account} is missing a {amount} re-credit ({reason})"
    )]
    CompensationFailed {
        account: Uuid,
        amount: i64,
        reason: String,
    },

    // === Transient infrastructure failure ===
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::MalformedAccountId(_) => "MALFORMED_ACCOUNT_ID",
            TransferError::SourceNotFound => "SOURCE_NOT_FOUND",
            TransferError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            TransferError::DestinationUnavailable(_) => "DESTINATION_UNAVAILABLE",
            TransferError::CompensationFailed { .. } => "COMPENSATION_FAILED",
            TransferError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::SameAccount
            | TransferError::InvalidAmount
            | TransferError::MalformedAccountId(_) => 400,
            TransferError::SourceNotFound
            | TransferError::InsufficientBalance
            | TransferError::DestinationUnavailable(_) => 422,
            TransferError::CompensationFailed { .. } => 500,
            TransferError::StoreUnavailable(_) => 503,
        }
    }

    /// True when the ledger sum invariant may be broken and an operator
    /// needs to look at this account.
    pub fn is_ledger_inconsistency(&self) -> bool {
        matches!(self, TransferError::CompensationFailed { .. })
    }
}

impl From<crate::account::StoreError> for TransferError {
    fn from(e: crate::account::StoreError) -> Self {
        TransferError::StoreUnavailable(e.to_string())
    }
}

impl From<crate::account::validation::ValidationError> for TransferError {
    fn from(e: crate::account::validation::ValidationError) -> Self {
        TransferError::MalformedAccountId(e.to_string())
    }
}
