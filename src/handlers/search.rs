// ABOUTME: Global search across programs, news, events and partnerships

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::storage::SearchSection;
use crate::types::SearchResponse;
use crate::validate::Checks;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Comma-separated section names; all sections when absent.
    pub sections: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    Checks::new().length("q", query.q.trim(), 2, None).finish()?;

    let sections = SearchSection::parse_list(query.sections.as_deref());
    let results = state.storage.search(&query.q, &sections).await?;
    Ok(Json(SearchResponse {
        total: results.len(),
        results,
    }))
}
