// ABOUTME: News endpoints: filtered public listing and detail, admin CRUD
// ABOUTME: Blank strings in admin updates leave the stored values unchanged

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{deleted, found, Pagination};
use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{News, NewsCategory, NewsCreate, NewsUpdate, Page, SuccessResponse};
use crate::validate::Validate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub category: Option<NewsCategory>,
    #[serde(default)]
    pub featured_only: bool,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl NewsQuery {
    fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Page<News>>> {
    let (page, page_size) = query.pagination().resolve(10, 50)?;
    let news = state
        .storage
        .list_news(query.category, query.featured_only, page, page_size)
        .await?;
    Ok(Json(news))
}

pub async fn get_news(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<News>> {
    let news = found(state.storage.get_news(&id).await?, "News article")?;
    Ok(Json(news))
}

pub async fn create_news(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(payload): Json<NewsCreate>,
) -> Result<Json<News>> {
    payload.validate()?;
    let news = state.storage.create_news(payload).await?;
    tracing::info!("{} published news {}", admin.username, news.id);
    Ok(Json(news))
}

pub async fn update_news(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<NewsUpdate>,
) -> Result<Json<News>> {
    let payload = payload.without_blanks();
    payload.validate()?;
    let news = found(state.storage.update_news(&id, payload).await?, "News")?;
    Ok(Json(news))
}

pub async fn delete_news(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    deleted(state.storage.delete_news(&id).await?, "News")
}
