//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SecurityConfig;
use crate::crypto::FieldCipher;
use crate::db::Store;
use crate::entities::{accounts, session_tokens};
use crate::services::ServiceError;
use crate::services::account_service::AccountView;
use crate::services::auth_service::{AuthService, SessionGrant};
use crate::services::credentials;

pub struct SeaOrmAuthService {
    store: Store,
    cipher: Arc<FieldCipher>,
    security: SecurityConfig,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, cipher: Arc<FieldCipher>, security: SecurityConfig) -> Self {
        Self {
            store,
            cipher,
            security,
        }
    }

    async fn issue(&self, account: accounts::Model) -> Result<SessionGrant, ServiceError> {
        let token = credentials::generate_token();
        let sealed = self
            .cipher
            .encode(&token)
            .map_err(|e| ServiceError::Internal(format!("Failed to seal session token: {e}")))?;

        let expires_at =
            timestamp(Utc::now() + chrono::Duration::days(self.security.session_ttl_days));

        self.store
            .sessions()
            .create(account.id, sealed, expires_at.clone())
            .await?;

        let department_ids = self.store.accounts().department_ids(account.id).await?;

        Ok(SessionGrant {
            token,
            expires_at,
            account: AccountView::from_model(account, department_ids),
        })
    }

    /// Finds the live session row for `token`, deleting it if it has expired.
    async fn live_session(&self, token: &str) -> Result<session_tokens::Model, ServiceError> {
        let fingerprint = self.cipher.fingerprint(token);
        let session = self
            .store
            .sessions()
            .find_by_fingerprint(&fingerprint)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid session token".to_string()))?;

        let stored = self
            .cipher
            .decode(&session.token_cipher)
            .map_err(|e| ServiceError::decode("session token", session.id, e))?;
        if stored != token {
            return Err(ServiceError::Unauthorized("Invalid session token".to_string()));
        }

        let expired = DateTime::parse_from_rfc3339(&session.expires_at)
            .map(|at| at.with_timezone(&Utc) <= Utc::now())
            .unwrap_or(true);

        if expired {
            self.store.sessions().delete(session.id).await?;
            debug!(account_id = session.account_id, "Rejected expired session token");
            return Err(ServiceError::Unauthorized("Session expired".to_string()));
        }

        Ok(session)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<SessionGrant, ServiceError> {
        let account = self
            .store
            .accounts()
            .get_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        if !credentials::verify_password_blocking(password, &account.password_hash).await? {
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        info!(account_id = account.id, "Login succeeded");
        self.issue(account).await
    }

    async fn authenticate(&self, token: &str) -> Result<AccountView, ServiceError> {
        let session = self.live_session(token).await?;

        let account = self
            .store
            .accounts()
            .get(session.account_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Account no longer exists".to_string()))?;

        let department_ids = self.store.accounts().department_ids(account.id).await?;
        Ok(AccountView::from_model(account, department_ids))
    }

    async fn refresh(&self, token: &str) -> Result<SessionGrant, ServiceError> {
        let session = self.live_session(token).await?;

        let account = self
            .store
            .accounts()
            .get(session.account_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Account no longer exists".to_string()))?;

        // A concurrent refresh or revocation already consumed this token
        if !self.store.sessions().delete(session.id).await? {
            return Err(ServiceError::Unauthorized("Invalid session token".to_string()));
        }

        self.issue(account).await
    }

    async fn logout(&self, token: &str) -> Result<(), ServiceError> {
        let session = self.live_session(token).await?;
        self.store.sessions().delete(session.id).await?;
        info!(account_id = session.account_id, "Logged out");
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, ServiceError> {
        let removed = self
            .store
            .sessions()
            .delete_expired(&timestamp(Utc::now()))
            .await?;
        Ok(removed)
    }
}
