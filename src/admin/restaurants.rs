//! Restaurant CRUD handlers.

use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::models::{Restaurant, RestaurantInput};

use super::error::{AppError, AppResult};
use super::AppState;

/// GET /admin/restaurants
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Restaurant>>> {
    Ok(Json(db::list_restaurants(&state.pool).await?))
}

/// GET /admin/restaurants/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = db::get_restaurant(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;
    Ok(Json(restaurant))
}

/// POST /admin/restaurants
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<RestaurantInput>,
) -> AppResult<Json<Restaurant>> {
    let id = db::create_restaurant(&state.pool, &input).await?;
    let restaurant = db::get_restaurant(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;
    Ok(Json(restaurant))
}

/// PUT /admin/restaurants/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<RestaurantInput>,
) -> AppResult<Json<Restaurant>> {
    if !db::update_restaurant(&state.pool, id, &input).await? {
        return Err(AppError::NotFound("Restaurant"));
    }
    let restaurant = db::get_restaurant(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;
    Ok(Json(restaurant))
}

/// DELETE /admin/restaurants/{id}
///
/// Dependent categories, products, orders and discounts survive with their
/// `restaurant_id` nulled out.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !db::delete_restaurant(&state.pool, id).await? {
        return Err(AppError::NotFound("Restaurant"));
    }
    Ok(Json(true))
}
