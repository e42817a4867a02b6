use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::account::{AccountProfile, AccountStore, NewAccount};

/// Opening credit for every new account, in minor units (100.00)
pub const OPENING_BALANCE: i64 = 10_000;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (account_id as string)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
}

impl Claims {
    pub fn account_id(&self) -> Option<Uuid> {
        Uuid::try_parse(&self.sub).ok()
    }
}

/// Account Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "somchai")]
    pub name: String,
    #[validate(email(message = "valid email is required"))]
    #[schema(example = "somchai@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Login Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "somchai@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth Response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
}

pub struct UserAuthService {
    store: Arc<dyn AccountStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl UserAuthService {
    pub fn new(store: Arc<dyn AccountStore>, jwt_secret: String, expire_hours: i64) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl: Duration::hours(expire_hours),
        }
    }

    /// Register a new account with the opening balance
    pub async fn register(&self, req: RegisterRequest) -> Result<AccountProfile> {
        // 1. Hash password
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Hashing failed: {}", e))?
            .to_string();

        // 2. Insert into the store
        let account = self
            .store
            .insert(NewAccount {
                name: req.name,
                email: req.email,
                password_hash,
                balance: OPENING_BALANCE,
            })
            .await?;

        Ok(account.profile())
    }

    /// Login and issue JWT
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        // 1. Find account by email. Unknown email and wrong password produce
        // the same message so the endpoint cannot be used to probe emails.
        let account = self
            .store
            .find_by_email(&req.email)
            .await
            .context("Store query failed")?
            .ok_or_else(|| anyhow::anyhow!("Invalid email or password"))?;

        // 2. Verify password
        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;

        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| anyhow::anyhow!("Invalid email or password"))?;

        // 3. Generate JWT
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.token_ttl)
            .context("valid timestamp")?
            .timestamp();

        let claims = Claims {
            sub: account.account_id.to_string(),
            exp: expiration as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .context("Failed to generate token")?;

        Ok(AuthResponse {
            token,
            account_id: account.account_id,
            name: account.name,
            email: account.email,
        })
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::StoreError;
    use crate::account::mock::MemAccountStore;

    fn service(store: Arc<MemAccountStore>) -> UserAuthService {
        UserAuthService::new(store, "test-secret".to_string(), 24)
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_credits_opening_balance() {
        let store = Arc::new(MemAccountStore::new());
        let auth = service(store.clone());

        let profile = auth
            .register(RegisterRequest {
                name: "somchai".to_string(),
                email: "somchai@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .expect("register should succeed");

        assert_eq!(profile.balance, "100.00");

        let stored = store
            .find_by_email("somchai@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "password123");
        assert!(stored.password_hash.starts_with("$argon2"));
        assert_eq!(stored.balance, OPENING_BALANCE);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_surfaces_store_error() {
        let store = Arc::new(MemAccountStore::new());
        let auth = service(store);

        let req = || RegisterRequest {
            name: "somchai".to_string(),
            email: "dup@example.com".to_string(),
            password: "password123".to_string(),
        };

        auth.register(req()).await.expect("first register ok");
        let err = auth.register(req()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::DuplicateEmail)
        ));
    }

    #[tokio::test]
    async fn test_login_roundtrip_and_token_verification() {
        let store = Arc::new(MemAccountStore::new());
        let auth = service(store);

        auth.register(RegisterRequest {
            name: "somchai".to_string(),
            email: "somchai@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

        let resp = auth
            .login(LoginRequest {
                email: "somchai@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .expect("login should succeed");

        let claims = auth.verify_token(&resp.token).expect("token should verify");
        assert_eq!(claims.account_id(), Some(resp.account_id));
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_identical() {
        let store = Arc::new(MemAccountStore::new());
        let auth = service(store);

        auth.register(RegisterRequest {
            name: "somchai".to_string(),
            email: "somchai@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

        let wrong_password = auth
            .login(LoginRequest {
                email: "somchai@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_verify_rejects_tampered_token() {
        let store = Arc::new(MemAccountStore::new());
        let auth = service(store);

        auth.register(RegisterRequest {
            name: "somchai".to_string(),
            email: "somchai@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

        let resp = auth
            .login(LoginRequest {
                email: "somchai@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        let mut tampered = resp.token.clone();
        tampered.pop();
        assert!(auth.verify_token(&tampered).is_err());

        let other = UserAuthService::new(
            Arc::new(MemAccountStore::new()),
            "other-secret".to_string(),
            24,
        );
        assert!(other.verify_token(&resp.token).is_err());
    }
}
