// ABOUTME: Contact and typed form submissions, plus the admin inbox
// ABOUTME: Each form type answers with its own confirmation message

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::error::{AppError, Result};
use crate::types::{Contact, ContactCreate, ContactStatus, FormType, MessageResponse, Record, SuccessResponse};
use crate::validate::Validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub form_type: Option<FormType>,
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactCreate>,
) -> Result<Json<SuccessResponse>> {
    payload.validate()?;
    let contact = state.storage.create_contact(payload).await?;
    tracing::info!("Received {} submission {}", contact.data.form_type, contact.id);
    Ok(Json(SuccessResponse::new(
        "Thank you for your message! We will get back to you within 24 hours.",
    )))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Path(form_type): Path<String>,
    Json(mut payload): Json<ContactCreate>,
) -> Result<Json<SuccessResponse>> {
    let form_type = FormType::from_path(&form_type).map_err(|msg| AppError::invalid("form_type", msg))?;
    payload.form_type = form_type;
    payload.validate()?;

    let contact = state.storage.create_contact(payload).await?;
    tracing::info!("Received {} submission {}", form_type, contact.id);
    Ok(Json(SuccessResponse::new(form_type.confirmation())))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ContactQuery>,
) -> Result<Json<Vec<Contact>>> {
    Ok(Json(state.storage.list_contacts(query.form_type).await?))
}

pub async fn mark_contact_read(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state
        .storage
        .update_contact_status(&id, ContactStatus::Read)
        .await?
    {
        return Err(AppError::NotFound(format!("{} not found", Contact::NOUN)));
    }
    Ok(Json(MessageResponse {
        message: "Contact marked as read".to_string(),
    }))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.storage.delete_contact(&id).await? {
        return Err(AppError::NotFound(format!("{} not found", Contact::NOUN)));
    }
    Ok(Json(MessageResponse {
        message: "Contact deleted successfully".to_string(),
    }))
}
