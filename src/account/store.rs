//! Account store capability
//!
//! [`AccountStore`] is the seam between the service and whatever holds the
//! documents. The contract that matters is [`AccountStore::apply_delta`]:
//! a linearizable conditional update on one document. No caller may
//! read-then-separately-write a balance.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::Account;

/// Store-level failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.code().as_deref() == Some("23505")
        {
            return StoreError::DuplicateEmail;
        }
        StoreError::Unavailable(e.to_string())
    }
}

/// Fields for account creation; the store assigns id and created_at
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Opening balance in minor units
    pub balance: i64,
}

/// List filter: case-insensitive substring match plus pagination
#[derive(Debug, Clone, Default)]
pub struct AccountQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl AccountQuery {
    /// Clamp pagination to sane values (page >= 1, limit defaults to 10)
    pub fn normalized(mut self) -> Self {
        if self.page < 1 {
            self.page = 1;
        }
        if self.limit < 1 {
            self.limit = 10;
        }
        self
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) * self.limit) as i64
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account and return the stored document.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Fetch one account by id.
    async fn get(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Fetch one account by email (login path).
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// List accounts matching the query.
    async fn list(&self, query: AccountQuery) -> Result<Vec<Account>, StoreError>;

    /// Count all accounts.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Atomically apply `delta` to the single account matching
    /// `account_id == id AND (require_at_least none OR balance >= require_at_least)`.
    ///
    /// Returns the post-update document, or `None` when no document matched
    /// (missing id or failed balance predicate). The update must be
    /// linearizable at single-document granularity: no concurrent caller may
    /// observe or apply an intermediate state.
    async fn apply_delta(
        &self,
        id: Uuid,
        delta: i64,
        require_at_least: Option<i64>,
    ) -> Result<Option<Account>, StoreError>;
}
