// ABOUTME: Gallery endpoints: public listing and detail, admin uploads through multipart forms
// ABOUTME: Deleting an item or replacing its image removes the uploaded file

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{deleted, found, Pagination};
use crate::auth::AdminSession;
use crate::error::{AppError, Result};
use crate::types::{GalleryImage, GalleryImageCreate, GalleryImageUpdate, Page, Record, SuccessResponse};
use crate::uploads::{MultipartForm, UploadKind};
use crate::validate::Validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Page<GalleryImage>>> {
    let (page, page_size) = Pagination {
        page: query.page,
        page_size: query.page_size,
    }
    .resolve(30, 100)?;
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    Ok(Json(state.storage.list_gallery(category, page, page_size).await?))
}

pub async fn get_gallery_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GalleryImage>> {
    let image = found(state.storage.get_gallery_image(&id).await?, GalleryImage::NOUN)?;
    Ok(Json(image))
}

pub async fn upload_gallery_image(
    State(state): State<AppState>,
    admin: AdminSession,
    multipart: Multipart,
) -> Result<Json<GalleryImage>> {
    let form = MultipartForm::read(multipart).await?;
    let file = form
        .file
        .as_ref()
        .ok_or_else(|| AppError::invalid("file", "field required"))?;
    file.check_image_type()?;

    let title = form.required("title")?;
    let mut image = GalleryImageCreate {
        alt: Some(title.clone()),
        title,
        description: form.text("description").unwrap_or_default(),
        image: String::new(),
        category: form.required("category")?,
        order: form.integer("order")?.unwrap_or(0),
        is_featured: form.boolean("is_featured")?.unwrap_or(false),
        is_active: form.boolean("is_active")?.unwrap_or(true),
        tags: Vec::new(),
    };

    image.image = state.uploads.save(UploadKind::Gallery, file).await?;
    if let Err(err) = image.validate() {
        state.uploads.remove(&image.image).await;
        return Err(err);
    }

    let image = state.storage.create_gallery_image(image).await?;
    tracing::info!("{} uploaded gallery image {}", admin.username, image.id);
    Ok(Json(image))
}

pub async fn update_gallery_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<GalleryImage>> {
    let existing = found(state.storage.get_gallery_image(&id).await?, GalleryImage::NOUN)?;
    let form = MultipartForm::read(multipart).await?;

    let mut update = GalleryImageUpdate {
        title: form.text("title"),
        description: form.text("description"),
        image: None,
        alt: None,
        category: form.text("category"),
        order: form.integer("order")?,
        is_featured: form.boolean("is_featured")?,
        is_active: form.boolean("is_active")?,
        tags: None,
    };
    update.validate()?;

    if let Some(file) = &form.file {
        update.image = Some(state.uploads.save(UploadKind::Gallery, file).await?);
        update.alt = update
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| existing.data.alt.clone())
            .or_else(|| Some(existing.data.title.clone()));
    } else if let Some(url) = form.non_blank("image_url") {
        update.image = Some(url);
    }

    let image = found(
        state.storage.update_gallery_image(&id, &update).await?,
        GalleryImage::NOUN,
    )?;

    if let Some(current) = update.image.as_deref() {
        if current != existing.data.image {
            state.uploads.remove(&existing.data.image).await;
        }
    }
    Ok(Json(image))
}

pub async fn delete_gallery_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let existing = state.storage.get_gallery_image(&id).await?;
    let removed = state.storage.delete_gallery_image(&id).await?;
    if let (true, Some(image)) = (removed, existing) {
        state.uploads.remove(&image.data.image).await;
    }
    deleted(removed, GalleryImage::NOUN)
}
