//! Discount CRUD handlers, including the active-flag toggle.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::db;
use crate::models::{Discount, DiscountInput};

use super::error::{AppError, AppResult};
use super::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Discount>>> {
    Ok(Json(db::list_discounts(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Discount>> {
    let discount = db::get_discount(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Discount"))?;
    Ok(Json(discount))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<DiscountInput>,
) -> AppResult<Json<Discount>> {
    let id = db::create_discount(&state.pool, &input).await?;
    let discount = db::get_discount(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Discount"))?;
    Ok(Json(discount))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<DiscountInput>,
) -> AppResult<Json<Discount>> {
    if !db::update_discount(&state.pool, id, &input).await? {
        return Err(AppError::NotFound("Discount"));
    }
    let discount = db::get_discount(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Discount"))?;
    Ok(Json(discount))
}

#[derive(Debug, Deserialize)]
pub struct ActiveUpdate {
    pub is_active: bool,
}

/// PUT /admin/discounts/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<ActiveUpdate>,
) -> AppResult<Json<Discount>> {
    if !db::set_discount_active(&state.pool, id, update.is_active).await? {
        return Err(AppError::NotFound("Discount"));
    }
    let discount = db::get_discount(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Discount"))?;
    Ok(Json(discount))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !db::delete_discount(&state.pool, id).await? {
        return Err(AppError::NotFound("Discount"));
    }
    Ok(Json(true))
}
