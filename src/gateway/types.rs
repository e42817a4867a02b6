//! API boundary types
//!
//! - [`ApiResponse<T>`]: unified response envelope
//! - [`error_codes`]: standard error code constants
//! - [`StrictAmount`]: format-validated monetary input

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::money::{MoneyError, to_minor_units};

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// StrictAmount: Format-Validated Monetary Input
// ============================================================================

/// Strict-format monetary amount - validates during deserialization
///
/// Only JSON strings are accepted; JSON numbers would arrive as floats and
/// bypass format control. Rejected outright:
/// - `.5` (must be `0.5`) and `5.` (must be `5.0` or `5`)
/// - negative amounts, `+` prefix, scientific notation, empty strings
///
/// Conversion to minor units happens in [`StrictAmount::minor_units`].
#[derive(Debug, Clone, Copy)]
pub struct StrictAmount(Decimal);

impl StrictAmount {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }

    /// Convert to i64 minor units, rejecting sub-cent precision
    pub fn minor_units(self) -> Result<i64, MoneyError> {
        to_minor_units(self.0)
    }
}

impl<'de> Deserialize<'de> for StrictAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;

        if s.is_empty() {
            return Err(D::Error::custom("Amount cannot be empty"));
        }

        if s.starts_with('.') {
            return Err(D::Error::custom("Invalid format: use 0.5 not .5"));
        }

        if s.ends_with('.') {
            return Err(D::Error::custom("Invalid format: use 5.0 not 5."));
        }

        if s.contains('e') || s.contains('E') {
            return Err(D::Error::custom(
                "Invalid format: scientific notation not allowed",
            ));
        }

        if s.starts_with('+') {
            return Err(D::Error::custom("Invalid format: + prefix not allowed"));
        }

        let d = Decimal::from_str(&s)
            .map_err(|e| D::Error::custom(format!("Invalid decimal: {}", e)))?;

        if d.is_sign_negative() {
            return Err(D::Error::custom("Amount cannot be negative"));
        }

        Ok(StrictAmount(d))
    }
}

impl Serialize for StrictAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&self.0.to_string())
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const TRANSFER_REJECTED: i32 = 1003;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;
    pub const FORBIDDEN: i32 = 2003;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    /// Transfer compensation failed: ledger needs operator attention
    pub const LEDGER_INCONSISTENT: i32 = 5002;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_amount_valid_string() {
        let json = r#""1.5""#;
        let amount: StrictAmount = serde_json::from_str(json).unwrap();
        assert_eq!(amount.inner(), Decimal::from_str("1.5").unwrap());
        assert_eq!(amount.minor_units(), Ok(150));
    }

    #[test]
    fn test_strict_amount_rejects_json_number() {
        let result: Result<StrictAmount, _> = serde_json::from_str("1.5");
        assert!(result.is_err());
    }

    #[test]
    fn test_strict_amount_rejects_bad_formats() {
        for json in [r#"".5""#, r#""5.""#, r#""1.5e8""#, r#""+1""#, r#""-1.5""#, r#""""#] {
            let result: Result<StrictAmount, _> = serde_json::from_str(json);
            assert!(result.is_err(), "should reject {}", json);
        }
    }

    #[test]
    fn test_strict_amount_sub_cent_rejected_at_conversion() {
        let amount: StrictAmount = serde_json::from_str(r#""0.001""#).unwrap();
        assert!(amount.minor_units().is_err());
    }

    #[test]
    fn test_api_response_shape() {
        let ok = ApiResponse::success(42);
        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(json, r#"{"code":0,"msg":"ok","data":42}"#);

        let err = ApiResponse::<()>::error(error_codes::INVALID_PARAMETER, "bad input");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":1001,"msg":"bad input"}"#);
    }
}
