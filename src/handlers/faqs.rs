// ABOUTME: FAQ endpoints: public listing by category and admin CRUD

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{deleted, found};
use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{Faq, FaqCategory, FaqCreate, FaqUpdate, Record, SuccessResponse};
use crate::validate::Validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FaqQuery {
    pub category: Option<FaqCategory>,
}

pub async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> Result<Json<Vec<Faq>>> {
    Ok(Json(state.storage.list_faqs(query.category).await?))
}

pub async fn create_faq(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<FaqCreate>,
) -> Result<Json<Faq>> {
    payload.validate()?;
    Ok(Json(state.storage.create_faq(payload).await?))
}

pub async fn update_faq(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<FaqUpdate>,
) -> Result<Json<Faq>> {
    payload.validate()?;
    let faq = found(state.storage.update_faq(&id, &payload).await?, Faq::NOUN)?;
    Ok(Json(faq))
}

pub async fn delete_faq(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    deleted(state.storage.delete_faq(&id).await?, Faq::NOUN)
}
