pub mod account;
pub mod health;
pub mod transfer;

pub use account::{ListAccountsParams, count_accounts, get_account, list_accounts};
pub use health::{HealthResponse, health_check};
pub use transfer::{TransferApiRequest, TransferApiResponse, post_transfer};
