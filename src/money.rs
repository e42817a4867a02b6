//! Minor-unit money conversions
//!
//! Balances are stored as i64 minor units (cents). Floating point never
//! touches a balance; the HTTP boundary parses decimal strings and converts
//! here, rejecting anything finer than [`BALANCE_DECIMALS`].

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Fixed scale for account balances (2 = cents)
pub const BALANCE_DECIMALS: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount precision exceeds {BALANCE_DECIMALS} decimals")]
    PrecisionOverflow,

    #[error("Amount is out of representable range")]
    OutOfRange,
}

/// Convert a decimal amount to i64 minor units.
///
/// Rejects sub-cent precision instead of rounding; silent rounding is how
/// ledgers drift.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    let scaled = amount
        .checked_mul(Decimal::from(10i64.pow(BALANCE_DECIMALS)))
        .ok_or(MoneyError::OutOfRange)?;

    if scaled.fract() != Decimal::ZERO {
        return Err(MoneyError::PrecisionOverflow);
    }

    scaled.to_i64().ok_or(MoneyError::OutOfRange)
}

/// Convert i64 minor units back to a decimal for display.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, BALANCE_DECIMALS)
}
