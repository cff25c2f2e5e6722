//! Admin service: authenticated CRUD routes under `/admin` plus the public
//! mini-app API under `/api`.

pub mod api;
pub mod auth;
pub mod categories;
pub mod discounts;
pub mod error;
pub mod orders;
pub mod products;
pub mod restaurants;

use std::collections::HashSet;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{middleware, Json, Router};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::notifier::Notifier;

pub use error::{AppError, AppResult};

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub settings: Arc<Settings>,
    /// Live admin session tokens; dies with the process.
    pub sessions: Arc<RwLock<HashSet<String>>>,
    pub notifier: Option<Notifier>,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: Settings, notifier: Option<Notifier>) -> Self {
        AppState {
            pool,
            settings: Arc::new(settings),
            sessions: Arc::new(RwLock::new(HashSet::new())),
            notifier,
        }
    }
}

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    // Everything here sits behind the bearer-token middleware.
    let admin_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route(
            "/restaurants",
            get(restaurants::list).post(restaurants::create),
        )
        .route(
            "/restaurants/{id}",
            get(restaurants::get_by_id)
                .put(restaurants::update)
                .delete(restaurants::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/discounts", get(discounts::list).post(discounts::create))
        .route(
            "/discounts/{id}",
            get(discounts::get_by_id)
                .put(discounts::update)
                .delete(discounts::delete),
        )
        .route("/discounts/{id}/active", put(discounts::set_active))
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::get_by_id))
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/orders/{id}/receipt", post(orders::attach_receipt))
        .route("/recent-orders", get(orders::recent))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        // Registered after route_layer: login itself skips the auth check.
        .route("/login", post(auth::login));

    // The mini-app runs on a foreign origin inside Telegram's webview.
    let public_api = Router::new()
        .route("/api/restaurants", get(api::restaurants))
        .route("/api/categories", get(api::categories))
        .route("/api/products", get(api::products))
        .route("/api/orders", post(api::create_order))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/health", get(health))
        .nest("/admin", admin_routes)
        .merge(public_api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
