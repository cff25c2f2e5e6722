//! Product CRUD handlers.

use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::models::{Product, ProductInput};

use super::error::{AppError, AppResult};
use super::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(db::list_products(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = db::get_product(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    Ok(Json(product))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    if input.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    let id = db::create_product(&state.pool, &input).await?;
    let product = db::get_product(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    Ok(Json(product))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    if input.price < 0.0 {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    if !db::update_product(&state.pool, id, &input).await? {
        return Err(AppError::NotFound("Product"));
    }
    let product = db::get_product(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    Ok(Json(product))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !db::delete_product(&state.pool, id).await? {
        return Err(AppError::NotFound("Product"));
    }
    Ok(Json(true))
}
