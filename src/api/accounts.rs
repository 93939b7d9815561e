use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentAccount;
use super::validation::{validate_id, validate_password, validate_username};
use super::{
    ApiError, ApiResponse, AppState, CreateAccountRequest, MessageResponse, UpdateAccountRequest,
    VersionRequest,
};
use crate::services::{AccountUpdate, AccountView, NewAccount};

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
) -> Result<Json<ApiResponse<Vec<AccountView>>>, ApiError> {
    let accounts = state
        .shared
        .account_service
        .list(current.principal())
        .await?;
    Ok(Json(ApiResponse::success(accounts)))
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let id = validate_id("account", id)?;
    let account = state
        .shared
        .account_service
        .get(current.principal(), id)
        .await?;
    Ok(Json(ApiResponse::success(account)))
}

pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;

    let account = state
        .shared
        .account_service
        .create(
            current.principal(),
            NewAccount {
                username: payload.username,
                password: payload.password,
                role: payload.role,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(account)))
}

/// PUT /accounts/{id}
/// Sessions of the edited account are revoked on success.
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let id = validate_id("account", id)?;
    if let Some(username) = &payload.username {
        validate_username(username)?;
    }
    if let Some(password) = &payload.password {
        validate_password(password)?;
    }

    let account = state
        .shared
        .account_service
        .update(
            current.principal(),
            id,
            AccountUpdate {
                version: payload.version,
                username: payload.username,
                password: payload.password,
                role: payload.role,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(account)))
}

pub async fn force_password_change(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
    Json(payload): Json<VersionRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    set_force_password_change(&state, &current, id, payload.version, true).await
}

pub async fn clear_force_password_change(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
    Json(payload): Json<VersionRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    set_force_password_change(&state, &current, id, payload.version, false).await
}

async fn set_force_password_change(
    state: &AppState,
    current: &CurrentAccount,
    id: i32,
    version: i32,
    required: bool,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    let id = validate_id("account", id)?;
    let account = state
        .shared
        .account_service
        .set_force_password_change(current.principal(), id, version, required)
        .await?;
    Ok(Json(ApiResponse::success(account)))
}

pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("account", id)?;
    state
        .shared
        .account_service
        .delete(current.principal(), id)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Account {id} deleted"
    )))))
}
