//! Category CRUD handlers.

use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::models::{Category, CategoryInput};

use super::error::{AppError, AppResult};
use super::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(db::list_categories(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = db::get_category(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;
    Ok(Json(category))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    let id = db::create_category(&state.pool, &input).await?;
    let category = db::get_category(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;
    Ok(Json(category))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    if !db::update_category(&state.pool, id, &input).await? {
        return Err(AppError::NotFound("Category"));
    }
    let category = db::get_category(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;
    Ok(Json(category))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !db::delete_category(&state.pool, id).await? {
        return Err(AppError::NotFound("Category"));
    }
    Ok(Json(true))
}
