//! Transfer engine
//!
//! Moves funds between two account documents without a multi-document
//! transaction. The store only guarantees atomicity per document, so the
//! engine runs a conditional debit, then a credit, and re-credits the source
//! when the credit cannot land. The compensating re-credit is best-effort:
//! its own failure is the one condition that leaves the ledger out of
//! balance, and it escalates as [`TransferError::CompensationFailed`] instead
//! of being folded into an ordinary failure.
//!
//! The engine holds no state of its own; it is safe to call from any number
//! of in-flight requests concurrently.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{Instant, timeout};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::account::validation::parse_account_id;
use crate::account::{Account, AccountStore, StoreError};

use super::error::TransferError;

/// Grace window for the compensating re-credit once the main deadline budget
/// is spent. Skipping compensation guarantees an inconsistent ledger, so it
/// always gets this much time.
const COMPENSATION_GRACE: Duration = Duration::from_secs(2);

/// One transfer order: ephemeral, constructed per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: Uuid,
    pub to: Uuid,
    /// Amount in minor units
    pub amount: i64,
}

impl TransferRequest {
    /// Normalize external id strings into store keys. Malformed ids fail
    /// here and never become filters.
    pub fn parse(from: &str, to: &str, amount: i64) -> Result<Self, TransferError> {
        Ok(Self {
            from: parse_account_id(from)?,
            to: parse_account_id(to)?,
            amount,
        })
    }
}

/// Confirmation of a completed transfer
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub transfer_id: Uuid,
    pub from: Uuid,
    pub to: Uuid,
    pub amount: i64,
    pub completed_at: DateTime<Utc>,
}

/// Outcome of one deadline-bounded store call
enum StepOutcome {
    Applied(Box<Account>),
    NoMatch,
    Failed(String),
    TimedOut,
}

pub struct TransferEngine {
    store: Arc<dyn AccountStore>,
    deadline: Duration,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn AccountStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// Execute a transfer: conditional debit, credit, compensate on failure.
    ///
    /// Not idempotent — retrying a completed transfer moves the funds again.
    /// Callers needing retry safety must dedup outside the engine.
    pub async fn transfer(
        &self,
        req: TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        if req.from == req.to {
            return Err(TransferError::SameAccount);
        }
        if req.amount <= 0 {
            return Err(TransferError::InvalidAmount);
        }

        let transfer_id = Uuid::new_v4();
        let started = Instant::now();

        // Step 1: debit source, filtered on balance >= amount.
        // No match means nothing was mutated; this step is terminal.
        let debit = self
            .bounded(
                started,
                self.store
                    .apply_delta(req.from, -req.amount, Some(req.amount)),
            )
            .await;

        match debit {
            StepOutcome::Applied(_) => {}
            StepOutcome::NoMatch => return Err(self.classify_source_rejection(req.from).await),
            StepOutcome::Failed(reason) => return Err(TransferError::StoreUnavailable(reason)),
            StepOutcome::TimedOut => {
                // Outcome of the debit is unknown; re-crediting blindly could
                // double-fund the source, so report transient failure as-is.
                warn!(transfer_id = %transfer_id, "Debit exceeded deadline, outcome unknown");
                return Err(TransferError::StoreUnavailable(
                    "deadline exceeded during debit".to_string(),
                ));
            }
        }

        // Step 2: credit destination. From here on the debit has landed and
        // every failure path must go through compensation.
        let credit = self
            .bounded(started, self.store.apply_delta(req.to, req.amount, None))
            .await;

        let credit_failure = match credit {
            StepOutcome::Applied(_) => {
                let receipt = TransferReceipt {
                    transfer_id,
                    from: req.from,
                    to: req.to,
                    amount: req.amount,
                    completed_at: Utc::now(),
                };
                info!(
                    transfer_id = %transfer_id,
                    amount = req.amount,
                    "Transfer committed: {} -> {}", req.from, req.to
                );
                return Ok(receipt);
            }
            StepOutcome::NoMatch => "destination account not found".to_string(),
            StepOutcome::Failed(reason) => reason,
            StepOutcome::TimedOut => "deadline exceeded during credit".to_string(),
        };

        Err(self.compensate(transfer_id, req, credit_failure).await)
    }

    /// Restore the source after a failed credit. The re-credit is
    /// unconditional (no balance filter) and runs under its own grace
    /// window even when the transfer deadline is spent.
    async fn compensate(
        &self,
        transfer_id: Uuid,
        req: TransferRequest,
        credit_failure: String,
    ) -> TransferError {
        let outcome = match timeout(
            COMPENSATION_GRACE,
            self.store.apply_delta(req.from, req.amount, None),
        )
        .await
        {
            Ok(Ok(Some(_))) => {
                warn!(
                    transfer_id = %transfer_id,
                    source = %req.from,
                    amount = req.amount,
                    "Credit failed, source restored: {}", credit_failure
                );
                return TransferError::DestinationUnavailable(credit_failure);
            }
            Ok(Ok(None)) => "source account disappeared before re-credit".to_string(),
            Ok(Err(e)) => e.to_string(),
            Err(_) => "deadline exceeded during re-credit".to_string(),
        };

        // The debit stands and the re-credit did not land: the sum invariant
        // is broken until an operator intervenes.
        error!(
            transfer_id = %transfer_id,
            source = %req.from,
            amount = req.amount,
            alert = true,
            "LEDGER INCONSISTENCY: compensation failed after credit failure \
             (credit: {}; compensation: {})", credit_failure, outcome
        );
        TransferError::CompensationFailed {
            account: req.from,
            amount: req.amount,
            reason: outcome,
        }
    }

    /// The conditional debit reports only "no document matched". Distinguish
    /// a missing source from an insufficient balance with a read-only probe;
    /// either answer is a no-mutation rejection, so losing a race with a
    /// concurrent writer can only swap one safe answer for the other.
    async fn classify_source_rejection(&self, source: Uuid) -> TransferError {
        match self.store.get(source).await {
            Ok(None) => TransferError::SourceNotFound,
            Ok(Some(_)) => TransferError::InsufficientBalance,
            Err(e) => TransferError::StoreUnavailable(e.to_string()),
        }
    }

    /// Run one store call against the remaining deadline budget.
    async fn bounded<F>(&self, started: Instant, call: F) -> StepOutcome
    where
        F: Future<Output = Result<Option<Account>, StoreError>>,
    {
        let remaining = self.deadline.saturating_sub(started.elapsed());
        match timeout(remaining, call).await {
            Ok(Ok(Some(account))) => StepOutcome::Applied(Box::new(account)),
            Ok(Ok(None)) => StepOutcome::NoMatch,
            Ok(Err(e)) => StepOutcome::Failed(e.to_string()),
            Err(_) => StepOutcome::TimedOut,
        }
    }
}
