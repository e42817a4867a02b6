use std::sync::Arc;

use crate::account::AccountStore;
use crate::transfer::TransferEngine;
use crate::user_auth::UserAuthService;

/// Shared gateway state
///
/// Everything here is injected at startup; there is no ambient global
/// configuration or store handle anywhere in the crate.
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub engine: Arc<TransferEngine>,
    pub user_auth: Arc<UserAuthService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AccountStore>,
        engine: Arc<TransferEngine>,
        user_auth: Arc<UserAuthService>,
    ) -> Self {
        Self {
            store,
            engine,
            user_auth,
        }
    }
}
