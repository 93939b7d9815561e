//! `SeaORM` implementation of the `DepartmentService` trait.

use async_trait::async_trait;
use sea_orm::TransactionTrait;
use std::sync::Arc;
use tracing::info;

use crate::crypto::FieldCipher;
use crate::db::{DepartmentRepository, Store};
use crate::domain::Role;
use crate::domain::authz::{self, Principal};
use crate::entities::{accounts, departments};
use crate::services::ServiceError;
use crate::services::account_service::AccountView;
use crate::services::department_service::{DepartmentService, DepartmentView};
use crate::services::lifecycle::{AccountLifecycle, AccountMutation};
use crate::services::link_service::LinkView;

pub struct SeaOrmDepartmentService {
    store: Store,
    cipher: Arc<FieldCipher>,
    lifecycle: AccountLifecycle,
}

/// Whether a membership change adds or removes the join row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    Add,
    Remove,
}

impl SeaOrmDepartmentService {
    #[must_use]
    pub fn new(store: Store, cipher: Arc<FieldCipher>) -> Self {
        Self {
            lifecycle: AccountLifecycle::new(store.clone()),
            store,
            cipher,
        }
    }

    async fn load(&self, id: i32) -> Result<departments::Model, ServiceError> {
        self.store
            .departments()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", id))
    }

    async fn load_account(&self, id: i32) -> Result<accounts::Model, ServiceError> {
        self.store
            .accounts()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", id))
    }

    async fn view(&self, model: departments::Model) -> Result<DepartmentView, ServiceError> {
        let repo = self.store.departments();

        let name = self
            .cipher
            .decode(&model.name_cipher)
            .map_err(|e| ServiceError::decode("department", model.id, e))?;

        let links = repo
            .links(&model)
            .await?
            .into_iter()
            .map(|link| LinkView::decode(&self.cipher, link))
            .collect::<Result<Vec<_>, _>>()?;

        let account_ids = repo.account_ids(model.id).await?;

        Ok(DepartmentView {
            id: model.id,
            name,
            links,
            account_ids,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn ensure_name_free(&self, name: &str, owner: Option<i32>) -> Result<(), ServiceError> {
        let fingerprint = self.cipher.fingerprint(name);
        if let Some(existing) = self.store.departments().find_by_fingerprint(&fingerprint).await?
            && Some(existing.id) != owner
        {
            return Err(ServiceError::conflict(format!(
                "A department named '{name}' already exists"
            )));
        }
        Ok(())
    }

    /// Membership change plus relationship-only touch of the member, atomically.
    async fn change_membership(
        &self,
        actor: Principal,
        department_id: i32,
        account_id: i32,
        version: i32,
        change: Membership,
    ) -> Result<AccountView, ServiceError> {
        authz::require_role(actor, Role::Admin)?;
        self.load(department_id).await?;

        let target = self.load_account(account_id).await?;
        authz::can_administer(actor, Principal::new(target.id, target.role))?;

        let mutation = AccountMutation::touch(account_id, version);

        let txn = self.store.conn.begin().await?;

        let account = AccountLifecycle::apply(&txn, &mutation).await?;

        match change {
            Membership::Add => {
                DepartmentRepository::add_account(&txn, department_id, account_id)
                    .await
                    .map_err(|e| match ServiceError::from(e) {
                        ServiceError::UniquenessConflict(_) => ServiceError::conflict(format!(
                            "Account {account_id} is already a member of department {department_id}"
                        )),
                        other => other,
                    })?;
            }
            Membership::Remove => {
                if !DepartmentRepository::remove_account(&txn, department_id, account_id).await? {
                    return Err(ServiceError::NotFound(format!(
                        "Membership of account {account_id} in department {department_id}"
                    )));
                }
            }
        }

        txn.commit().await?;
        self.lifecycle.after_commit(&account, mutation.kind).await;

        info!(
            account_id,
            department_id,
            version = account.version,
            change = ?change,
            changed_by = actor.id,
            "Department membership changed"
        );

        let department_ids = self.store.accounts().department_ids(account_id).await?;
        Ok(AccountView::from_model(account, department_ids))
    }
}

#[async_trait]
impl DepartmentService for SeaOrmDepartmentService {
    async fn list(&self) -> Result<Vec<DepartmentView>, ServiceError> {
        let models = self.store.departments().list().await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.view(model).await?);
        }
        Ok(views)
    }

    async fn get(&self, id: i32) -> Result<DepartmentView, ServiceError> {
        let model = self.load(id).await?;
        self.view(model).await
    }

    async fn create(&self, actor: Principal, name: &str) -> Result<DepartmentView, ServiceError> {
        authz::require_role(actor, Role::Admin)?;
        self.ensure_name_free(name, None).await?;

        let sealed = self
            .cipher
            .encode(name)
            .map_err(|e| ServiceError::Internal(format!("Failed to seal department name: {e}")))?;
        let model = self.store.departments().create(sealed).await?;

        info!(department_id = model.id, created_by = actor.id, "Department created");
        self.view(model).await
    }

    async fn rename(
        &self,
        actor: Principal,
        id: i32,
        name: &str,
    ) -> Result<DepartmentView, ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        let existing = self.load(id).await?;
        self.ensure_name_free(name, Some(id)).await?;

        let sealed = self
            .cipher
            .encode(name)
            .map_err(|e| ServiceError::Internal(format!("Failed to seal department name: {e}")))?;
        let model = self.store.departments().rename(existing, sealed).await?;

        info!(department_id = id, updated_by = actor.id, "Department renamed");
        self.view(model).await
    }

    async fn delete(&self, actor: Principal, id: i32) -> Result<(), ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        // Each dropped membership row touches its account in the same transaction
        let txn = self.store.conn.begin().await?;

        let members = DepartmentRepository::members(&txn, id).await?;
        let mut touched = Vec::with_capacity(members.len());
        for member in &members {
            let mutation = AccountMutation::touch(member.id, member.version);
            touched.push((AccountLifecycle::apply(&txn, &mutation).await?, mutation.kind));
        }

        if !DepartmentRepository::delete(&txn, id).await? {
            return Err(ServiceError::not_found("Department", id));
        }

        txn.commit().await?;
        for (account, kind) in &touched {
            self.lifecycle.after_commit(account, *kind).await;
        }

        info!(
            department_id = id,
            members = touched.len(),
            deleted_by = actor.id,
            "Department deleted"
        );
        Ok(())
    }

    async fn add_link(
        &self,
        actor: Principal,
        department_id: i32,
        link_id: i32,
    ) -> Result<DepartmentView, ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        let department = self.load(department_id).await?;
        if self.store.links().get(link_id).await?.is_none() {
            return Err(ServiceError::not_found("Link", link_id));
        }

        self.store
            .departments()
            .add_link(department_id, link_id)
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::UniquenessConflict(_) => ServiceError::conflict(format!(
                    "Link {link_id} is already published by department {department_id}"
                )),
                other => other,
            })?;

        info!(department_id, link_id, changed_by = actor.id, "Link added to department");
        self.view(department).await
    }

    async fn remove_link(
        &self,
        actor: Principal,
        department_id: i32,
        link_id: i32,
    ) -> Result<DepartmentView, ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        let department = self.load(department_id).await?;
        if !self
            .store
            .departments()
            .remove_link(department_id, link_id)
            .await?
        {
            return Err(ServiceError::NotFound(format!(
                "Link {link_id} in department {department_id}"
            )));
        }

        info!(department_id, link_id, changed_by = actor.id, "Link removed from department");
        self.view(department).await
    }

    async fn add_account(
        &self,
        actor: Principal,
        department_id: i32,
        account_id: i32,
        version: i32,
    ) -> Result<AccountView, ServiceError> {
        self.change_membership(actor, department_id, account_id, version, Membership::Add)
            .await
    }

    async fn remove_account(
        &self,
        actor: Principal,
        department_id: i32,
        account_id: i32,
        version: i32,
    ) -> Result<AccountView, ServiceError> {
        self.change_membership(actor, department_id, account_id, version, Membership::Remove)
            .await
    }
}
