//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Userbank API",
        version = "0.1.0",
        description = "User account service: registration, login, account queries, and balance transfers.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::gateway::handlers::account::get_account,
        crate::gateway::handlers::account::list_accounts,
        crate::gateway::handlers::account::count_accounts,
        crate::gateway::handlers::transfer::post_transfer,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Health and diagnostics"),
        (name = "Auth", description = "Registration and login"),
        (name = "Accounts", description = "Account queries"),
        (name = "Transfers", description = "Balance transfers"),
    )
)]
pub struct ApiDoc;
