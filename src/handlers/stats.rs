// ABOUTME: Site statistics endpoints and the admin-editable counters behind them

use axum::{extract::State, Json};

use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{ExtendedStats, Stats, StatsConfig, StatsConfigUpdate};
use crate::validate::Validate;
use crate::AppState;

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    Ok(Json(state.storage.stats().await?))
}

pub async fn get_extended_stats(State(state): State<AppState>) -> Result<Json<ExtendedStats>> {
    Ok(Json(state.storage.extended_stats().await?))
}

pub async fn get_stats_config(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<StatsConfig>> {
    Ok(Json(state.storage.get_stats_config().await?))
}

pub async fn update_stats_config(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(payload): Json<StatsConfigUpdate>,
) -> Result<Json<StatsConfig>> {
    payload.validate()?;
    let config = state.storage.update_stats_config(&payload).await?;
    tracing::info!(
        "{} set studentsExchanged to {}",
        admin.username,
        config.students_exchanged
    );
    Ok(Json(config))
}
