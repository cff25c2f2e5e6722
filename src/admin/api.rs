//! Public JSON API consumed by the browser mini-app.
//!
//! Unauthenticated and CORS-open: the mini-app runs inside Telegram's
//! webview on a different origin. Payload shapes match what the front-end
//! already sends (`order`/`totalSum` naming included).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db;
use crate::models::{Category, NewOrder, NewOrderItem, Product, Restaurant};
use crate::notifier::{NotificationLine, OrderNotification};

use super::error::{AppError, AppResult};
use super::AppState;

#[derive(Debug, Serialize)]
pub struct RestaurantsResponse {
    pub restaurants: Vec<Restaurant>,
}

/// GET /api/restaurants
pub async fn restaurants(State(state): State<AppState>) -> AppResult<Json<RestaurantsResponse>> {
    Ok(Json(RestaurantsResponse {
        restaurants: db::list_restaurants(&state.pool).await?,
    }))
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

/// GET /api/categories
pub async fn categories(State(state): State<AppState>) -> AppResult<Json<CategoriesResponse>> {
    Ok(Json(CategoriesResponse {
        categories: db::list_categories(&state.pool).await?,
    }))
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// Product with its category embedded, the shape the mini-app renders.
#[derive(Debug, Serialize)]
pub struct ApiProduct {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<CategoryRef>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<ApiProduct>,
}

/// GET /api/products
pub async fn products(State(state): State<AppState>) -> AppResult<Json<ProductsResponse>> {
    let products = db::list_products(&state.pool).await?;
    let categories = db::list_categories(&state.pool).await?;

    let products = products
        .into_iter()
        .map(|product| {
            let category = product.category_id.and_then(|id| {
                categories
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| CategoryRef {
                        id: c.id,
                        name: c.name.clone(),
                    })
            });
            ApiProduct { product, category }
        })
        .collect();

    Ok(Json(ProductsResponse { products }))
}

#[derive(Debug, Deserialize)]
pub struct MiniAppOrderLine {
    pub id: i64,
    pub name: String,
    pub qty: i64,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct MiniAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MiniAppOrder {
    pub order: Vec<MiniAppOrderLine>,
    #[serde(rename = "totalSum")]
    pub total_sum: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub user: Option<MiniAppUser>,
}

#[derive(Debug, Serialize)]
pub struct OrderCreatedResponse {
    pub order_id: i64,
}

/// POST /api/orders
///
/// Creates the user when the mini-app passed one, then the order and its
/// snapshot lines in one transaction. The client-computed total is stored
/// as-is. A notification goes out after the commit, best-effort.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<MiniAppOrder>,
) -> AppResult<Json<OrderCreatedResponse>> {
    if payload.order.is_empty() {
        return Err(AppError::Validation("order must not be empty".to_string()));
    }

    let customer_name = payload.user.as_ref().map(|u| {
        format!("{} {}", u.first_name, u.last_name)
            .trim()
            .to_string()
    });
    let user_id = match &payload.user {
        Some(user) => Some(
            db::get_or_create_user(&state.pool, &user.id.to_string(), customer_name.as_deref())
                .await?
                .id,
        ),
        None => None,
    };

    let new_order = NewOrder {
        user_id,
        restaurant_id: payload.restaurant_id,
        total: payload.total_sum,
        phone: None,
        items: payload
            .order
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.id,
                quantity: line.qty,
                price: line.price,
                discount_price: None,
            })
            .collect(),
    };
    let order_id = db::create_order(&state.pool, &new_order).await?;
    info!(order_id, "Mini-app order accepted");

    if let Some(notifier) = state.notifier.clone() {
        let notification = OrderNotification {
            order_id,
            customer_name,
            customer_username: payload.user.as_ref().and_then(|u| u.username.clone()),
            phone: None,
            address: payload.address.clone(),
            items: payload
                .order
                .iter()
                .map(|line| NotificationLine {
                    name: line.name.clone(),
                    quantity: line.qty,
                    price: line.price,
                })
                .collect(),
            total: payload.total_sum,
            created_at: chrono::Utc::now(),
        };
        tokio::spawn(async move {
            notifier.send_order_notification(&notification).await;
        });
    }

    Ok(Json(OrderCreatedResponse { order_id }))
}
