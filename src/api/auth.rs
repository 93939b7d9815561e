use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::validation::{validate_password, validate_username};
use super::{
    ApiError, ApiResponse, AppState, LoginRequest, MessageResponse, UpdateSelfRequest,
};
use crate::domain::authz::Principal;
use crate::services::{AccountView, SelfUpdate, SessionGrant};

/// Account resolved from the bearer token of the current request.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub AccountView);

impl CurrentAccount {
    #[must_use]
    pub const fn principal(&self) -> Principal {
        self.0.principal()
    }
}

/// Raw bearer token of the current request.
#[derive(Debug, Clone)]
pub struct PresentedToken(pub String);

// ============================================================================
// Middleware
// ============================================================================

/// Resolves `Authorization: Bearer <token>` to a [`CurrentAccount`].
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let account = state.shared.auth_service.authenticate(&token).await?;
    tracing::Span::current().record("account_id", account.id);

    request.extensions_mut().insert(CurrentAccount(account));
    request.extensions_mut().insert(PresentedToken(token));

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionGrant>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let grant = state
        .shared
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(grant)))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<PresentedToken>,
) -> Result<Json<ApiResponse<SessionGrant>>, ApiError> {
    let grant = state.shared.auth_service.refresh(&token.0).await?;
    Ok(Json(ApiResponse::success(grant)))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<PresentedToken>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.shared.auth_service.logout(&token.0).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new("Logged out"))))
}

/// GET /auth/me
pub async fn get_current_account(
    Extension(current): Extension<CurrentAccount>,
) -> Json<ApiResponse<AccountView>> {
    Json(ApiResponse::success(current.0))
}

/// PUT /auth/me
/// Every successful change signs the account out everywhere.
pub async fn update_current_account(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Json(payload): Json<UpdateSelfRequest>,
) -> Result<Json<ApiResponse<AccountView>>, ApiError> {
    if let Some(username) = &payload.username {
        validate_username(username)?;
    }
    if let Some(password) = &payload.new_password {
        validate_password(password)?;
    }

    let account = state
        .shared
        .account_service
        .update_self(
            current.principal(),
            SelfUpdate {
                version: payload.version,
                username: payload.username,
                current_password: payload.current_password,
                new_password: payload.new_password,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(account)))
}
