//! Domain service for departments and their memberships.
//!
//! Adding or removing a member touches the member's account version in the
//! same transaction as the join row change, without revoking its sessions.

use serde::Serialize;

use crate::domain::authz::Principal;

use super::ServiceError;
use super::account_service::AccountView;
use super::link_service::LinkView;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DepartmentView {
    pub id: i32,
    pub name: String,
    pub links: Vec<LinkView>,
    pub account_ids: Vec<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[async_trait::async_trait]
pub trait DepartmentService: Send + Sync {
    async fn list(&self) -> Result<Vec<DepartmentView>, ServiceError>;

    async fn get(&self, id: i32) -> Result<DepartmentView, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::UniquenessConflict`] if the name is taken.
    async fn create(&self, actor: Principal, name: &str) -> Result<DepartmentView, ServiceError>;

    async fn rename(
        &self,
        actor: Principal,
        id: i32,
        name: &str,
    ) -> Result<DepartmentView, ServiceError>;

    /// Deletes the department and its association rows only.
    async fn delete(&self, actor: Principal, id: i32) -> Result<(), ServiceError>;

    /// Publishes a link under the department and returns the refreshed department.
    async fn add_link(
        &self,
        actor: Principal,
        department_id: i32,
        link_id: i32,
    ) -> Result<DepartmentView, ServiceError>;

    async fn remove_link(
        &self,
        actor: Principal,
        department_id: i32,
        link_id: i32,
    ) -> Result<DepartmentView, ServiceError>;

    /// Adds a member and returns the member account with its bumped version.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::VersionConflict`] if `version` is stale and
    /// [`ServiceError::UniquenessConflict`] if the account is already a member.
    async fn add_account(
        &self,
        actor: Principal,
        department_id: i32,
        account_id: i32,
        version: i32,
    ) -> Result<AccountView, ServiceError>;

    async fn remove_account(
        &self,
        actor: Principal,
        department_id: i32,
        account_id: i32,
        version: i32,
    ) -> Result<AccountView, ServiceError>;
}
