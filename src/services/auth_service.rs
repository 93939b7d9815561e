//! Domain service for authentication.
//!
//! Handles login, session token issuance, rotation and validation.

use serde::Serialize;

use super::ServiceError;
use super::account_service::AccountView;

/// Login or refresh result: the raw token is only ever returned here.
#[derive(Debug, Clone, Serialize)]
pub struct SessionGrant {
    pub token: String,
    pub expires_at: String,
    pub account: AccountView,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and issues a new session token.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<SessionGrant, ServiceError>;

    /// Resolves a presented token to its account.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] for unknown, revoked or expired tokens.
    async fn authenticate(&self, token: &str) -> Result<AccountView, ServiceError>;

    /// Replaces the presented token with a fresh one.
    async fn refresh(&self, token: &str) -> Result<SessionGrant, ServiceError>;

    /// Destroys the presented token.
    async fn logout(&self, token: &str) -> Result<(), ServiceError>;

    /// Drops expired tokens and returns how many were removed.
    async fn purge_expired(&self) -> Result<u64, ServiceError>;
}
