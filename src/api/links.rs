use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentAccount;
use super::validation::{
    validate_address, validate_description, validate_id, validate_image, validate_name,
};
use super::{ApiError, ApiResponse, AppState, LinkRequest, MessageResponse};
use crate::services::{LinkInput, LinkView};

fn link_input(payload: LinkRequest) -> Result<LinkInput, ApiError> {
    Ok(LinkInput {
        name: validate_name(&payload.name)?.to_string(),
        address: validate_address(&payload.address)?,
        description: validate_description(payload.description)?,
        image: validate_image(payload.image)?,
    })
}

/// GET /public/links
/// Unauthenticated listing for the portal landing page.
pub async fn list_public_links(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LinkView>>>, ApiError> {
    let links = state.shared.link_service.list().await?;
    Ok(Json(ApiResponse::success(links)))
}

pub async fn list_links(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LinkView>>>, ApiError> {
    let links = state.shared.link_service.list().await?;
    Ok(Json(ApiResponse::success(links)))
}

pub async fn get_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<LinkView>>, ApiError> {
    let id = validate_id("link", id)?;
    let link = state.shared.link_service.get(id).await?;
    Ok(Json(ApiResponse::success(link)))
}

pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Json(payload): Json<LinkRequest>,
) -> Result<Json<ApiResponse<LinkView>>, ApiError> {
    let input = link_input(payload)?;
    let link = state
        .shared
        .link_service
        .create(current.principal(), input)
        .await?;
    Ok(Json(ApiResponse::success(link)))
}

pub async fn update_link(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
    Json(payload): Json<LinkRequest>,
) -> Result<Json<ApiResponse<LinkView>>, ApiError> {
    let id = validate_id("link", id)?;
    let input = link_input(payload)?;
    let link = state
        .shared
        .link_service
        .update(current.principal(), id, input)
        .await?;
    Ok(Json(ApiResponse::success(link)))
}

pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("link", id)?;
    state
        .shared
        .link_service
        .delete(current.principal(), id)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Link {id} deleted"
    )))))
}
