//! Authentication service - Customer login and bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the principal's id, name and role.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{sha256_digest, CredentialHasher, Principal, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// The principal these claims describe. An unknown role is not trusted.
    pub fn principal(&self) -> AppResult<Principal> {
        let role: Role = self.role.parse().map_err(|_| AppError::Unauthenticated)?;
        Ok(Principal::new(self.sub.clone(), self.name.clone(), role))
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange customer credentials for a token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    fn issue_token(&self, principal: &Principal) -> AppResult<TokenResponse>;
}

/// Sign a token for `principal`. Also used by the `token` command.
pub fn issue_token(principal: &Principal, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: principal.id.clone(),
        name: principal.name.clone(),
        role: principal.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    hasher: CredentialHasher,
    config: Config,
    /// Verified against when the email is unknown, so both paths cost the same
    dummy_digest: String,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, hasher: CredentialHasher, config: Config) -> Self {
        let dummy_digest = hasher
            .hash("dummy-password-for-unknown-accounts")
            .unwrap_or_else(|_| sha256_digest("dummy-password-for-unknown-accounts"));
        Self {
            uow,
            hasher,
            config,
            dummy_digest,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let customer = self.uow.customers().find_customer_by_email(&email).await?;

        let digest = customer
            .as_ref()
            .map_or(self.dummy_digest.as_str(), |c| c.hashed_password.as_str());
        let password_valid = self.hasher.verify(&password, digest);

        match customer {
            Some(customer) if password_valid => {
                tracing::debug!(customer = %customer.id, "Customer logged in");
                let principal = Principal::new(customer.id, customer.name, Role::Customer);
                issue_token(&principal, &self.config)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    fn issue_token(&self, principal: &Principal) -> AppResult<TokenResponse> {
        issue_token(principal, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, HashScheme};
    use crate::infra::{InMemoryPersistence, InMemoryStore};

    const SECRET: &str = "test-secret-key-minimum-32-chars!!";

    fn authenticator() -> Authenticator<InMemoryPersistence> {
        let store = Arc::new(InMemoryStore::new());
        store
            .seed_customers([Customer {
                id: "ALFKI".to_string(),
                name: "Alfreds Futterkiste".to_string(),
                current_balance_cents: 0,
                email: "alfreds@demo.com".to_string(),
                cedula: "0000000001".to_string(),
                hashed_password: sha256_digest("Pass123!"),
                profile_picture: None,
            }])
            .unwrap();

        Authenticator::new(
            Arc::new(InMemoryPersistence::new(store)),
            CredentialHasher::new(HashScheme::Sha256),
            Config::with_jwt_secret(SECRET),
        )
    }

    #[tokio::test]
    async fn test_login_issues_customer_token() {
        let auth = authenticator();

        let token = auth
            .login("alfreds@demo.com".to_string(), "Pass123!".to_string())
            .await
            .unwrap();
        let principal = auth.verify_token(&token.access_token).unwrap().principal().unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(principal.id, "ALFKI");
        assert_eq!(principal.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let auth = authenticator();

        let wrong_password = auth
            .login("alfreds@demo.com".to_string(), "wrong".to_string())
            .await;
        let unknown_email = auth
            .login("nobody@demo.com".to_string(), "Pass123!".to_string())
            .await;

        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let principal = Principal::new("e-1", "Nancy", Role::Employee);
        let foreign = issue_token(
            &principal,
            &Config::with_jwt_secret("another-secret-key-minimum-32-chars"),
        )
        .unwrap();

        assert!(authenticator().verify_token(&foreign.access_token).is_err());
    }
}
