// ABOUTME: Event endpoints for visits, delegations and conferences
// ABOUTME: Public listing filters by type and upcoming dates; admins manage entries

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{deleted, found, Pagination};
use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{Event, EventCreate, EventType, EventUpdate, Page, Record, SuccessResponse};
use crate::validate::Validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub upcoming_only: bool,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Page<Event>>> {
    let (page, page_size) = Pagination {
        page: query.page,
        page_size: query.page_size,
    }
    .resolve(20, 100)?;
    let events = state
        .storage
        .list_events(query.event_type, query.upcoming_only, page, page_size)
        .await?;
    Ok(Json(events))
}

pub async fn get_event(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Event>> {
    let event = found(state.storage.get_event(&id).await?, Event::NOUN)?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(payload): Json<EventCreate>,
) -> Result<Json<Event>> {
    payload.validate()?;
    let event = state.storage.create_event(payload).await?;
    tracing::info!("{} scheduled event {}", admin.username, event.id);
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<EventUpdate>,
) -> Result<Json<Event>> {
    let payload = payload.without_blanks();
    payload.validate()?;
    let event = found(state.storage.update_event(&id, payload).await?, Event::NOUN)?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    deleted(state.storage.delete_event(&id).await?, Event::NOUN)
}
