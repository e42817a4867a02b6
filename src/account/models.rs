//! Data models for user accounts

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::money::from_minor_units;

/// Persisted account document
///
/// `balance` is i64 minor units (cents). The store owns this state; the
/// transfer engine only ever mutates it through conditional updates.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            account_id: self.account_id,
            name: self.name.clone(),
            email: self.email.clone(),
            balance: from_minor_units(self.balance).to_string(),
            created_at: self.created_at,
        }
    }
}

/// Public view of an account (no password hash, balance formatted)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountProfile {
    pub account_id: Uuid,
    #[schema(example = "somchai")]
    pub name: String,
    #[schema(example = "somchai@example.com")]
    pub email: String,
    /// Balance as a decimal string to preserve precision
    #[schema(example = "100.00")]
    pub balance: String,
    pub created_at: DateTime<Utc>,
}
