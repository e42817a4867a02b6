//! Userbank - User Account Service
//!
//! CRUD, authentication, and balance transfers over a PostgreSQL-backed
//! account store.
//!
//! # Modules
//!
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing setup (rolling file + stdout)
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`money`] - minor-unit money conversions
//! - [`account`] - account documents, store capability, validation
//! - [`transfer`] - the transfer engine (conditional debit/credit + compensation)
//! - [`user_auth`] - registration, login, JWT verification
//! - [`gateway`] - axum HTTP surface
//!
//! The transfer engine is the part that earns its keep: the store offers
//! atomic updates on single documents only, so moving funds is a conditional
//! debit, a credit, and a compensating re-credit when the credit fails -
//! with a failed compensation escalated as a first-class ledger
//! inconsistency instead of being swallowed.

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod money;
pub mod transfer;
pub mod user_auth;

// Convenient re-exports at crate root
pub use account::{Account, AccountStore, PgAccountRepository, StoreError};
pub use transfer::{TransferEngine, TransferError, TransferReceipt, TransferRequest};
pub use user_auth::UserAuthService;
