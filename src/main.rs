//! Userbank - User Account Service
//!
//! Entry point. Wires the PostgreSQL store, the transfer engine, and the
//! auth service into the gateway:
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│ PG Store  │───▶│  Engine  │───▶│ Gateway  │
//! │  (YAML)  │    │ (sqlx)    │    │ (saga)   │    │ (axum)   │
//! └──────────┘    └───────────┘    └──────────┘    └──────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use userbank::account::{AccountStore, PgAccountRepository};
use userbank::config::AppConfig;
use userbank::db::Database;
use userbank::gateway::{self, state::AppState};
use userbank::transfer::TransferEngine;
use userbank::user_auth::UserAuthService;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = userbank::logging::init_logging(&config);

    tracing::info!("Starting userbank in {} mode", env);

    let postgres_url = config
        .postgres_url
        .clone()
        .expect("postgres_url must be set in config");

    let db = Database::connect(&postgres_url)
        .await
        .expect("Failed to connect to PostgreSQL");
    db.init_schema().await.expect("Failed to bootstrap schema");

    let store: Arc<dyn AccountStore> = Arc::new(PgAccountRepository::new(db.pool().clone()));

    let engine = Arc::new(TransferEngine::new(
        store.clone(),
        Duration::from_millis(config.transfer.deadline_ms),
    ));
    let user_auth = Arc::new(UserAuthService::new(
        store.clone(),
        config.jwt.secret.clone(),
        config.jwt.expire_hours,
    ));

    let state = Arc::new(AppState::new(store.clone(), engine, user_auth));

    // Periodic account census, same cadence as the service this replaces
    tokio::spawn({
        let store = store.clone();
        async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(10));
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                match store.count().await {
                    Ok(count) => tracing::info!("Total accounts in store: {}", count),
                    Err(e) => tracing::warn!("Failed to count accounts: {}", e),
                }
            }
        }
    });

    let port = get_port_override().unwrap_or(config.gateway.port);
    if let Err(e) = gateway::run_server(&config.gateway.host, port, state).await {
        tracing::error!("Gateway exited with error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server gracefully stopped");
}
