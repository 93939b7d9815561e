//! Domain service for account administration and self-service edits.
//!
//! Every mutation carries the version the caller last read and goes through
//! [`super::AccountLifecycle`].

use serde::Serialize;

use crate::domain::Role;
use crate::domain::authz::Principal;
use crate::entities::accounts;

use super::ServiceError;

/// Account as exposed to clients (never includes the password hash).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountView {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub must_change_password: bool,
    pub version: i32,
    pub department_ids: Vec<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl AccountView {
    #[must_use]
    pub fn from_model(model: accounts::Model, department_ids: Vec<i32>) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
            must_change_password: model.must_change_password,
            version: model.version,
            department_ids,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Administrative edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub version: i32,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Edit of the caller's own account.
#[derive(Debug, Clone, Default)]
pub struct SelfUpdate {
    pub version: i32,
    pub username: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    async fn list(&self, actor: Principal) -> Result<Vec<AccountView>, ServiceError>;

    /// Admins may read any account; everyone may read their own.
    async fn get(&self, actor: Principal, id: i32) -> Result<AccountView, ServiceError>;

    /// Creates an account at version 0 that must change its password.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UniquenessConflict`] if the username is taken.
    async fn create(&self, actor: Principal, input: NewAccount)
    -> Result<AccountView, ServiceError>;

    /// Applies an administrative edit and revokes the account's sessions.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::VersionConflict`] if `input.version` is stale and
    /// [`ServiceError::AuthorizationDenied`] for privilege violations.
    async fn update(
        &self,
        actor: Principal,
        id: i32,
        input: AccountUpdate,
    ) -> Result<AccountView, ServiceError>;

    /// Marks or clears the forced password change flag.
    async fn set_force_password_change(
        &self,
        actor: Principal,
        id: i32,
        version: i32,
        required: bool,
    ) -> Result<AccountView, ServiceError>;

    async fn delete(&self, actor: Principal, id: i32) -> Result<(), ServiceError>;

    /// Username and password changes by the account owner.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the current password is wrong.
    async fn update_self(
        &self,
        actor: Principal,
        input: SelfUpdate,
    ) -> Result<AccountView, ServiceError>;
}
