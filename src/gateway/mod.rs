//! HTTP gateway
//!
//! Route layout follows the original service surface: account creation and
//! login are public, everything else sits behind the JWT middleware.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::user_auth::jwt_auth_middleware;
use openapi::ApiDoc;
use state::AppState;

/// Build the gateway router
pub fn build_router(state: Arc<AppState>) -> Router {
    // Routes that require a valid bearer token
    let protected = Router::new()
        .route("/api/v1/users", get(handlers::list_accounts))
        .route("/api/v1/users/count", get(handlers::count_accounts))
        .route("/api/v1/users/{id}", get(handlers::get_account))
        .route("/api/v1/users/transfer", post(handlers::post_transfer))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/users", post(crate::user_auth::handlers::register))
        .route("/api/v1/auth/login", post(crate::user_auth::handlers::login))
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

/// Start the HTTP gateway and serve until shutdown is signalled
pub async fn run_server(
    host: &str,
    port: u16,
    state: Arc<AppState>,
) -> Result<(), std::io::Error> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
        return;
    }
    tracing::info!("Received shutdown signal, draining connections");
}
