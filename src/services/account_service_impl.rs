//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{AccountChanges, Store};
use crate::domain::Role;
use crate::domain::authz::{self, Principal};
use crate::entities::accounts;
use crate::services::ServiceError;
use crate::services::account_service::{
    AccountService, AccountUpdate, AccountView, NewAccount, SelfUpdate,
};
use crate::services::credentials;
use crate::services::lifecycle::{AccountLifecycle, AccountMutation};

pub struct SeaOrmAccountService {
    store: Store,
    lifecycle: AccountLifecycle,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        Self {
            lifecycle: AccountLifecycle::new(store.clone()),
            store,
            security,
        }
    }

    async fn load(&self, id: i32) -> Result<accounts::Model, ServiceError> {
        self.store
            .accounts()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", id))
    }

    async fn view(&self, model: accounts::Model) -> Result<AccountView, ServiceError> {
        let department_ids = self.store.accounts().department_ids(model.id).await?;
        Ok(AccountView::from_model(model, department_ids))
    }

    async fn ensure_username_free(
        &self,
        username: &str,
        owner: Option<i32>,
    ) -> Result<(), ServiceError> {
        if let Some(existing) = self.store.accounts().get_by_username(username).await?
            && Some(existing.id) != owner
        {
            return Err(ServiceError::conflict(format!(
                "Username '{username}' is already taken"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn list(&self, actor: Principal) -> Result<Vec<AccountView>, ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        let models = self.store.accounts().list().await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.view(model).await?);
        }
        Ok(views)
    }

    async fn get(&self, actor: Principal, id: i32) -> Result<AccountView, ServiceError> {
        if actor.id != id {
            authz::require_role(actor, Role::Admin)?;
        }

        let model = self.load(id).await?;
        self.view(model).await
    }

    async fn create(
        &self,
        actor: Principal,
        input: NewAccount,
    ) -> Result<AccountView, ServiceError> {
        authz::can_create(actor, input.role)?;
        self.ensure_username_free(&input.username, None).await?;

        let password_hash =
            credentials::hash_password_blocking(&input.password, &self.security).await?;

        let model = self
            .store
            .accounts()
            .create(&input.username, password_hash, input.role)
            .await?;

        info!(
            account_id = model.id,
            created_by = actor.id,
            role = %model.role,
            "Account created"
        );

        self.view(model).await
    }

    async fn update(
        &self,
        actor: Principal,
        id: i32,
        input: AccountUpdate,
    ) -> Result<AccountView, ServiceError> {
        let target = self.load(id).await?;
        let target_principal = Principal::new(target.id, target.role);

        authz::can_administer(actor, target_principal)?;
        if let Some(role) = input.role {
            authz::can_assign_role(actor, target_principal, role)?;
        }

        if input.username.is_none() && input.password.is_none() && input.role.is_none() {
            return Err(ServiceError::validation("Nothing to update"));
        }

        if let Some(username) = &input.username {
            self.ensure_username_free(username, Some(id)).await?;
        }

        let mut changes = AccountChanges {
            username: input.username,
            role: input.role,
            ..AccountChanges::default()
        };

        if let Some(password) = &input.password {
            changes.password_hash =
                Some(credentials::hash_password_blocking(password, &self.security).await?);
            // An administrator-set password is temporary
            changes.must_change_password = Some(true);
        }

        let model = self
            .lifecycle
            .run(AccountMutation::direct(id, input.version, changes))
            .await?;

        info!(account_id = id, updated_by = actor.id, version = model.version, "Account updated");

        self.view(model).await
    }

    async fn set_force_password_change(
        &self,
        actor: Principal,
        id: i32,
        version: i32,
        required: bool,
    ) -> Result<AccountView, ServiceError> {
        let target = self.load(id).await?;
        authz::can_administer(actor, Principal::new(target.id, target.role))?;

        let changes = AccountChanges {
            must_change_password: Some(required),
            ..AccountChanges::default()
        };

        let model = self
            .lifecycle
            .run(AccountMutation::direct(id, version, changes))
            .await?;

        info!(
            account_id = id,
            updated_by = actor.id,
            required,
            "Forced password change flag updated"
        );

        self.view(model).await
    }

    async fn delete(&self, actor: Principal, id: i32) -> Result<(), ServiceError> {
        let target = self.load(id).await?;
        authz::can_delete(actor, Principal::new(target.id, target.role))?;

        if !self.store.accounts().delete(id).await? {
            return Err(ServiceError::not_found("Account", id));
        }

        info!(account_id = id, deleted_by = actor.id, "Account deleted");
        Ok(())
    }

    async fn update_self(
        &self,
        actor: Principal,
        input: SelfUpdate,
    ) -> Result<AccountView, ServiceError> {
        let account = self.load(actor.id).await?;

        if input.username.is_none() && input.new_password.is_none() {
            return Err(ServiceError::validation("Nothing to update"));
        }

        let mut changes = AccountChanges::default();

        if let Some(username) = input.username {
            self.ensure_username_free(&username, Some(account.id)).await?;
            changes.username = Some(username);
        }

        if let Some(new_password) = &input.new_password {
            let current = input
                .current_password
                .as_deref()
                .ok_or_else(|| ServiceError::validation("Current password is required"))?;

            if current == new_password {
                return Err(ServiceError::validation(
                    "New password must be different from current password",
                ));
            }

            if !credentials::verify_password_blocking(current, &account.password_hash).await? {
                return Err(ServiceError::validation("Current password is incorrect"));
            }

            changes.password_hash =
                Some(credentials::hash_password_blocking(new_password, &self.security).await?);
            changes.must_change_password = Some(false);
        }

        let model = self
            .lifecycle
            .run(AccountMutation::direct(account.id, input.version, changes))
            .await?;

        info!(account_id = model.id, version = model.version, "Account updated by owner");

        self.view(model).await
    }
}
