//! Department endpoints, including the membership and link association
//! routes. Membership changes carry the member account's version and return
//! the refreshed account; link changes return the refreshed department.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::auth::CurrentAccount;
use super::validation::{validate_id, validate_name};
use super::{
    AddLinkRequest, AddMemberRequest, ApiError, ApiResponse, AppState, DepartmentRequest,
    MessageResponse, VersionRequest,
};
use crate::services::{AccountView, DepartmentView};

pub async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DepartmentView>>>, ApiError> {
    let departments = state.shared.department_service.list().await?;
    Ok(Json(ApiResponse::success(departments)))
}

pub async fn get_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DepartmentView>>, ApiError> {
    let id = validate_id("department", id)?;
    let department = state.shared.department_service.get(id).await?;
    Ok(Json(ApiResponse::success(department)))
}

pub async fn create_department(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Json(payload): Json<DepartmentRequest>,
) -> Result<Json<ApiResponse<DepartmentView>>, ApiError> {
    let name = validate_name(&payload.name)?;
    let department = state
        .shared
        .department_service
        .create(current.principal(), name)
        .await?;
    Ok(Json(ApiResponse::success(department)))
}

pub async fn rename_department(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
    Json(payload): Json<DepartmentRequest>,
) -> Result<Json<ApiResponse<DepartmentView>>, ApiError> {
    let id = validate_id("department", id)?;
    let name = validate_name(&payload.name)?;
    let department = state
        .shared
        .department_service
        .rename(current.principal(), id, name)
        .await?;
    Ok(Json(ApiResponse::success(department)))
}

pub async fn delete_department(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("department", id)?;
    state
        .shared
        .department_service
        .delete(current.principal(), id)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Department {id} deleted"
    )))))
}

/// POST /departments/{id}/accounts
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let id = validate_id("department", id)?;
    let account_id = validate_id("account", payload.account_id)?;

    let account = state
        .shared
        .department_service
        .add_account(current.principal(), id, account_id, payload.version)
        .await?;
    Ok(Json(ApiResponse::success(account)))
}

/// DELETE /departments/{id}/accounts/{account_id}?version=N
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, account_id)): Path<(i32, i32)>,
    Query(query): Query<VersionRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let id = validate_id("department", id)?;
    let account_id = validate_id("account", account_id)?;

    let account = state
        .shared
        .department_service
        .remove_account(current.principal(), id, account_id, query.version)
        .await?;
    Ok(Json(ApiResponse::success(account)))
}

pub async fn add_link(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
    Json(payload): Json<AddLinkRequest>,
) -> Result<Json<ApiResponse<DepartmentView>>, ApiError> {
    let id = validate_id("department", id)?;
    let link_id = validate_id("link", payload.link_id)?;

    let department = state
        .shared
        .department_service
        .add_link(current.principal(), id, link_id)
        .await?;
    Ok(Json(ApiResponse::success(department)))
}

pub async fn remove_link(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path((id, link_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<DepartmentView>>, ApiError> {
    let id = validate_id("department", id)?;
    let link_id = validate_id("link", link_id)?;

    let department = state
        .shared
        .department_service
        .remove_link(current.principal(), id, link_id)
        .await?;
    Ok(Json(ApiResponse::success(department)))
}
