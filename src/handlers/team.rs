// ABOUTME: Team member endpoints, with multipart forms for portrait uploads
// ABOUTME: Replacing or clearing a portrait deletes the previously uploaded file

use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use super::{deleted, found};
use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{Record, SuccessResponse, TeamMember, TeamMemberCreate, TeamMemberUpdate};
use crate::uploads::{MultipartForm, UploadKind};
use crate::validate::Validate;
use crate::AppState;

/// Image URLs from the admin form are either absolute or relative to the site root.
fn normalize_image_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{}", url)
    }
}

pub async fn list_team(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>> {
    Ok(Json(state.storage.list_team().await?))
}

pub async fn get_team_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamMember>> {
    let member = found(state.storage.get_team_member(&id).await?, TeamMember::NOUN)?;
    Ok(Json(member))
}

pub async fn create_team_member(
    State(state): State<AppState>,
    admin: AdminSession,
    multipart: Multipart,
) -> Result<Json<TeamMember>> {
    let form = MultipartForm::read(multipart).await?;

    let mut member = TeamMemberCreate {
        name: form.required("name")?,
        role: form.required("role")?,
        bio: form.required("bio")?,
        image: None,
        email: form.non_blank("email"),
        phone: form.non_blank("phone"),
        office: form.non_blank("office"),
        department: form.non_blank("department"),
        responsibilities: Vec::new(),
        order: form.integer("order")?.unwrap_or(0),
        is_leadership: form.boolean("is_leadership")?.unwrap_or(false),
        is_active: form.boolean("is_active")?.unwrap_or(true),
    };
    member.validate()?;

    member.image = match &form.file {
        Some(file) => Some(state.uploads.save(UploadKind::Team, file).await?),
        None => form.non_blank("image_url").map(|url| normalize_image_url(&url)),
    };

    let member = state.storage.create_team_member(member).await?;
    tracing::info!("{} added team member {}", admin.username, member.id);
    Ok(Json(member))
}

pub async fn update_team_member(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<TeamMember>> {
    let existing = found(state.storage.get_team_member(&id).await?, TeamMember::NOUN)?;
    let form = MultipartForm::read(multipart).await?;

    let mut update = TeamMemberUpdate {
        name: form.text("name"),
        role: form.text("role"),
        bio: form.text("bio"),
        image: None,
        email: form.non_blank("email"),
        phone: form.non_blank("phone"),
        office: form.non_blank("office"),
        department: form.non_blank("department"),
        responsibilities: None,
        order: form.integer("order")?,
        is_leadership: form.boolean("is_leadership")?,
        is_active: form.boolean("is_active")?,
    };
    update.validate()?;

    let previous_image = existing.data.image.filter(|image| !image.is_empty());
    if let Some(file) = &form.file {
        update.image = Some(state.uploads.save(UploadKind::Team, file).await?);
    } else if let Some(url) = form.text("image_url") {
        // An empty value removes the portrait.
        update.image = Some(if url.trim().is_empty() {
            String::new()
        } else {
            normalize_image_url(&url)
        });
    }

    let member = found(
        state.storage.update_team_member(&id, &update).await?,
        TeamMember::NOUN,
    )?;

    if let (Some(previous), Some(current)) = (previous_image, update.image.as_deref()) {
        if previous != current {
            state.uploads.remove(&previous).await;
        }
    }
    Ok(Json(member))
}

pub async fn delete_team_member(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let existing = state.storage.get_team_member(&id).await?;
    let removed = state.storage.delete_team_member(&id).await?;
    if let Some(image) = existing.and_then(|member| member.data.image) {
        if removed && !image.is_empty() {
            state.uploads.remove(&image).await;
        }
    }
    deleted(removed, TeamMember::NOUN)
}
