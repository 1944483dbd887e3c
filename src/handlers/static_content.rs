// ABOUTME: Static page content endpoints, addressed by key rather than id

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{deleted, found};
use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{Record, StaticContent, StaticContentCreate, StaticContentUpdate, SuccessResponse};
use crate::validate::Validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SectionQuery {
    pub section: Option<String>,
}

pub async fn list_static_content(
    State(state): State<AppState>,
    Query(query): Query<SectionQuery>,
) -> Result<Json<Vec<StaticContent>>> {
    let section = query.section.as_deref().filter(|s| !s.is_empty());
    Ok(Json(state.storage.list_static_content(section).await?))
}

pub async fn get_static_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StaticContent>> {
    let content = found(state.storage.get_static_content(&key).await?, StaticContent::NOUN)?;
    Ok(Json(content))
}

pub async fn create_static_content(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<StaticContentCreate>,
) -> Result<Json<StaticContent>> {
    payload.validate()?;
    Ok(Json(state.storage.create_static_content(payload).await?))
}

pub async fn update_static_content(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(key): Path<String>,
    Json(payload): Json<StaticContentUpdate>,
) -> Result<Json<StaticContent>> {
    payload.validate()?;
    let content = found(
        state.storage.update_static_content(&key, &payload).await?,
        StaticContent::NOUN,
    )?;
    Ok(Json(content))
}

pub async fn delete_static_content(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(key): Path<String>,
) -> Result<Json<SuccessResponse>> {
    deleted(state.storage.delete_static_content(&key).await?, StaticContent::NOUN)
}
