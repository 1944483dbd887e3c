// ABOUTME: Partnership endpoints: public listing by type and country, admin CRUD

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{deleted, found, Pagination};
use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{
    Page, Partnership, PartnershipCreate, PartnershipType, PartnershipUpdate, Record,
    SuccessResponse,
};
use crate::validate::Validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PartnershipQuery {
    #[serde(rename = "type")]
    pub partnership_type: Option<PartnershipType>,
    pub country: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub async fn list_partnerships(
    State(state): State<AppState>,
    Query(query): Query<PartnershipQuery>,
) -> Result<Json<Page<Partnership>>> {
    let (page, page_size) = Pagination {
        page: query.page,
        page_size: query.page_size,
    }
    .resolve(50, 100)?;
    let partnerships = state
        .storage
        .list_partnerships(
            query.partnership_type,
            query.country.as_deref().filter(|c| !c.is_empty()),
            page,
            page_size,
        )
        .await?;
    Ok(Json(partnerships))
}

pub async fn get_partnership(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Partnership>> {
    let partnership = found(state.storage.get_partnership(&id).await?, Partnership::NOUN)?;
    Ok(Json(partnership))
}

pub async fn create_partnership(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(payload): Json<PartnershipCreate>,
) -> Result<Json<Partnership>> {
    payload.validate()?;
    let partnership = state.storage.create_partnership(payload).await?;
    tracing::info!("{} added partnership {}", admin.username, partnership.id);
    Ok(Json(partnership))
}

pub async fn update_partnership(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<PartnershipUpdate>,
) -> Result<Json<Partnership>> {
    payload.validate()?;
    let partnership = found(
        state.storage.update_partnership(&id, &payload).await?,
        Partnership::NOUN,
    )?;
    Ok(Json(partnership))
}

pub async fn delete_partnership(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    deleted(state.storage.delete_partnership(&id).await?, Partnership::NOUN)
}
