//! In-memory account store for tests
//!
//! Same contract as the PostgreSQL repository, with knobs to inject store
//! failures and latency at a chosen call index so the engine's compensation
//! and deadline paths can be driven deterministically.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::models::Account;
use super::store::{AccountQuery, AccountStore, NewAccount, StoreError};

pub struct MemAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
    delta_calls: AtomicUsize,
    /// apply_delta call indices (1-based) that fail with a store error
    fail_on_calls: Mutex<HashSet<usize>>,
    /// Sleep before executing apply_delta call #n
    delay_on_call: Mutex<Option<(usize, Duration)>>,
}

impl MemAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            delta_calls: AtomicUsize::new(0),
            fail_on_calls: Mutex::new(HashSet::new()),
            delay_on_call: Mutex::new(None),
        }
    }

    /// Insert an account directly, bypassing the trait (test seeding)
    pub fn seed(&self, name: &str, balance: i64) -> Uuid {
        let account_id = Uuid::new_v4();
        let account = Account {
            account_id,
            name: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "seeded".to_string(),
            balance,
            created_at: Utc::now(),
        };
        self.accounts.lock().unwrap().insert(account_id, account);
        account_id
    }

    pub fn balance_of(&self, id: Uuid) -> Option<i64> {
        self.accounts.lock().unwrap().get(&id).map(|a| a.balance)
    }

    pub fn set_fail_on_calls(&self, calls: &[usize]) {
        *self.fail_on_calls.lock().unwrap() = calls.iter().copied().collect();
    }

    pub fn set_delay_on_call(&self, call: usize, delay: Duration) {
        *self.delay_on_call.lock().unwrap() = Some((call, delay));
    }

    pub fn delta_call_count(&self) -> usize {
        self.delta_calls.load(Ordering::SeqCst)
    }
}

impl Default for MemAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let stored = Account {
            account_id: Uuid::new_v4(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            balance: account.balance,
            created_at: Utc::now(),
        };
        accounts.insert(stored.account_id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn list(&self, query: AccountQuery) -> Result<Vec<Account>, StoreError> {
        let query = query.normalized();
        let accounts = self.accounts.lock().unwrap();

        let mut matched: Vec<Account> = accounts
            .values()
            .filter(|a| {
                query
                    .name
                    .as_deref()
                    .is_none_or(|n| a.name.to_lowercase().contains(&n.to_lowercase()))
                    && query
                        .email
                        .as_deref()
                        .is_none_or(|e| a.email.to_lowercase().contains(&e.to_lowercase()))
            })
            .cloned()
            .collect();
        matched.sort_by_key(|a| a.created_at);

        Ok(matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.accounts.lock().unwrap().len() as i64)
    }

    async fn apply_delta(
        &self,
        id: Uuid,
        delta: i64,
        require_at_least: Option<i64>,
    ) -> Result<Option<Account>, StoreError> {
        let call = self.delta_calls.fetch_add(1, Ordering::SeqCst) + 1;

        let delay = *self.delay_on_call.lock().unwrap();
        if let Some((on_call, duration)) = delay
            && call == on_call
        {
            tokio::time::sleep(duration).await;
        }

        if self.fail_on_calls.lock().unwrap().contains(&call) {
            return Err(StoreError::Unavailable("injected store failure".to_string()));
        }

        let mut accounts = self.accounts.lock().unwrap();
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(min) = require_at_least
            && account.balance < min
        {
            return Ok(None);
        }

        let updated = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| StoreError::Unavailable("balance overflow".to_string()))?;
        if updated < 0 {
            // mirrors the CHECK (balance >= 0) constraint
            return Err(StoreError::Unavailable("balance check violated".to_string()));
        }
        account.balance = updated;

        Ok(Some(account.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_conditional_update_semantics() {
        let store = MemAccountStore::new();
        let id = store.seed("alice", 3_000);

        // predicate fails, no mutation
        let missed = store.apply_delta(id, -5_000, Some(5_000)).await.unwrap();
        assert!(missed.is_none());
        assert_eq!(store.balance_of(id), Some(3_000));

        // predicate holds
        let updated = store.apply_delta(id, -1_000, Some(1_000)).await.unwrap();
        assert_eq!(updated.unwrap().balance, 2_000);

        // unknown id
        let missing = store.apply_delta(Uuid::new_v4(), 100, None).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemAccountStore::new();
        let id = store.seed("bob", 1_000);

        store.set_fail_on_calls(&[2]);
        assert!(store.apply_delta(id, -100, None).await.is_ok());
        assert!(store.apply_delta(id, -100, None).await.is_err());
        assert!(store.apply_delta(id, -100, None).await.is_ok());
        assert_eq!(store.delta_call_count(), 3);
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let store = MemAccountStore::new();
        store.seed("alice", 0);
        store.seed("bob", 0);
        store.seed("alicia", 0);

        let matched = store
            .list(AccountQuery {
                name: Some("ali".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(matched.len(), 2);

        let page = store
            .list(AccountQuery {
                page: 2,
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }
}
