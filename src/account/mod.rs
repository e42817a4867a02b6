//! Account domain: document model, store capability, validation
//!
//! The store is consumed through the [`AccountStore`] trait. Its one
//! non-negotiable contract is `apply_delta`: an atomic conditional
//! read-modify-write on a single account document. Everything the transfer
//! engine guarantees rests on that single-document atomicity.

pub mod models;
pub mod repository;
pub mod store;
pub mod validation;

#[cfg(test)]
pub mod mock;

pub use models::{Account, AccountProfile};
pub use repository::PgAccountRepository;
pub use store::{AccountQuery, AccountStore, NewAccount, StoreError};
