// ABOUTME: Exchange program endpoints: public listing and detail, admin CRUD
// ABOUTME: Public listings only show active programs

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{deleted, found, Pagination};
use crate::auth::AdminSession;
use crate::error::Result;
use crate::types::{Page, Program, ProgramCreate, ProgramUpdate, Record, SuccessResponse};
use crate::validate::Validate;
use crate::AppState;

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 100;

pub async fn list_programs(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<Program>>> {
    let (page, page_size) = pagination.resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)?;
    let programs = state.storage.list_programs(true, page, page_size).await?;
    Ok(Json(programs))
}

pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Program>> {
    let program = found(state.storage.get_program(&id).await?, Program::NOUN)?;
    Ok(Json(program))
}

pub async fn list_all_programs(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<Program>>> {
    let (page, page_size) = pagination.resolve(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)?;
    let programs = state.storage.list_programs(false, page, page_size).await?;
    Ok(Json(programs))
}

pub async fn create_program(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(payload): Json<ProgramCreate>,
) -> Result<Json<Program>> {
    payload.validate()?;
    let program = state.storage.create_program(payload).await?;
    tracing::info!("{} created program {}", admin.username, program.id);
    Ok(Json(program))
}

pub async fn update_program(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<ProgramUpdate>,
) -> Result<Json<Program>> {
    payload.validate()?;
    let program = found(
        state.storage.update_program(&id, &payload).await?,
        Program::NOUN,
    )?;
    Ok(Json(program))
}

pub async fn delete_program(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    deleted(state.storage.delete_program(&id).await?, Program::NOUN)
}
