//! Router-level tests for the admin service and the mini-app API.

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use online_customer::admin::{build_router, AppState};
use online_customer::config::Settings;
use online_customer::db;

fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "admin123".to_string(),
        bot_token: None,
        operator_chat_id: None,
        host: "127.0.0.1".to_string(),
        admin_port: 8000,
    }
}

async fn setup_app() -> Result<(Router, SqlitePool)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    db::init_database_schema(&pool).await?;
    let state = AppState::new(pool.clone(), test_settings(), None);
    Ok((build_router(state), pool))
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn read_json(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn login(app: &Router) -> Result<String> {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/login",
            None,
            json!({"username": "admin", "password": "admin123"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    Ok(body["token"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn test_login_accepts_only_configured_credentials() -> Result<()> {
    let (app, _pool) = setup_app().await?;

    // The configured pair works.
    login(&app).await?;

    // Anything else is rejected.
    for (username, password) in [
        ("admin", "wrong"),
        ("root", "admin123"),
        ("", ""),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/admin/login",
                None,
                json!({"username": username, "password": password}),
            ))
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

#[tokio::test]
async fn test_admin_routes_require_token() -> Result<()> {
    let (app, _pool) = setup_app().await?;

    let response = app
        .clone()
        .oneshot(get_request("/admin/restaurants", None))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/admin/restaurants", Some("bogus-token")))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_logout_revokes_token() -> Result<()> {
    let (app, _pool) = setup_app().await?;
    let token = login(&app).await?;

    let response = app
        .clone()
        .oneshot(get_request("/admin/restaurants", Some(&token)))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/logout",
            Some(&token),
            json!({}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/admin/restaurants", Some(&token)))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_restaurant_crud_round_trip() -> Result<()> {
    let (app, _pool) = setup_app().await?;
    let token = login(&app).await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/restaurants",
            Some(&token),
            json!({"name": "You Coffee", "address": "25 Kabardinskaya St"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let created = read_json(response).await?;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "You Coffee");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/admin/restaurants/{id}"),
            Some(&token),
            json!({"name": "You Coffee", "address": "1 New St"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await?;
    assert_eq!(updated["address"], "1 New St");

    let response = app
        .clone()
        .oneshot(get_request("/admin/restaurants", Some(&token)))
        .await?;
    let listing = read_json(response).await?;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/admin/restaurants/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/admin/restaurants/{id}"),
            Some(&token),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_missing_order_returns_404() -> Result<()> {
    let (app, _pool) = setup_app().await?;
    let token = login(&app).await?;

    let response = app
        .clone()
        .oneshot(get_request("/admin/orders/9999", Some(&token)))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/admin/orders/9999/status",
            Some(&token),
            json!({"status": "paid"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_discount_toggle_over_http() -> Result<()> {
    let (app, _pool) = setup_app().await?;
    let token = login(&app).await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/discounts",
            Some(&token),
            json!({"title": "20% off desserts", "is_active": true}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let discount = read_json(response).await?;
    let id = discount["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/admin/discounts/{id}/active"),
            Some(&token),
            json!({"is_active": false}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/admin/discounts/{id}"), Some(&token)))
        .await?;
    let fetched = read_json(response).await?;
    assert_eq!(fetched["is_active"], json!(false));
    Ok(())
}

#[tokio::test]
async fn test_order_status_update_sets_paid_at() -> Result<()> {
    let (app, pool) = setup_app().await?;
    let token = login(&app).await?;

    let order_id = db::create_order(
        &pool,
        &online_customer::models::NewOrder {
            user_id: None,
            restaurant_id: None,
            total: 230.0,
            phone: None,
            items: vec![],
        },
    )
    .await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/admin/orders/{order_id}/status"),
            Some(&token),
            json!({"status": "paid"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/admin/orders/{order_id}"), Some(&token)))
        .await?;
    let detail = read_json(response).await?;
    assert_eq!(detail["status"], "paid");
    assert!(!detail["paid_at"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_mini_app_order_intake() -> Result<()> {
    let (app, pool) = setup_app().await?;

    // No auth needed on the public API.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            None,
            json!({
                "order": [
                    {"id": 1, "name": "Americano", "qty": 2, "price": 150},
                    {"id": 2, "name": "Cappuccino", "qty": 1, "price": 210}
                ],
                "totalSum": 510,
                "address": "You Coffee (Nalchik)",
                "restaurant_id": null,
                "user": {"id": 777, "first_name": "Alice", "last_name": "", "username": "alice"}
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    let order_id = body["order_id"].as_i64().unwrap();

    let items = db::list_order_items(&pool, order_id).await?;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].price, 150.0);

    let user = db::get_user_by_telegram_id(&pool, "777").await?.unwrap();
    assert_eq!(user.name.as_deref(), Some("Alice"));

    let order = db::get_order(&pool, order_id).await?.unwrap();
    assert_eq!(order.user_id, Some(user.id));
    assert_eq!(order.total, 510.0);
    Ok(())
}

#[tokio::test]
async fn test_mini_app_rejects_empty_order() -> Result<()> {
    let (app, _pool) = setup_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            None,
            json!({"order": [], "totalSum": 0}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_products_api_embeds_category() -> Result<()> {
    let (app, pool) = setup_app().await?;

    let restaurant_id = db::create_restaurant(
        &pool,
        &online_customer::models::RestaurantInput {
            name: "You Coffee".to_string(),
            address: "25 Kabardinskaya St".to_string(),
        },
    )
    .await?;
    let category_id = db::create_category(
        &pool,
        &online_customer::models::CategoryInput {
            name: "Drinks".to_string(),
            restaurant_id: Some(restaurant_id),
        },
    )
    .await?;
    db::create_product(
        &pool,
        &online_customer::models::ProductInput {
            name: "Americano".to_string(),
            description: Some("Classic black coffee".to_string()),
            category_id: Some(category_id),
            restaurant_id: Some(restaurant_id),
            price: 150.0,
            discount_price: None,
            size: Some("250 ml".to_string()),
            photo: None,
            is_available: true,
            stock: 100,
        },
    )
    .await?;

    let response = app.clone().oneshot(get_request("/api/products", None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Americano");
    assert_eq!(products[0]["category"]["name"], "Drinks");

    let response = app
        .clone()
        .oneshot(get_request("/api/restaurants", None))
        .await?;
    let body = read_json(response).await?;
    assert_eq!(body["restaurants"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_health_probe() -> Result<()> {
    let (app, _pool) = setup_app().await?;
    let response = app.clone().oneshot(get_request("/health", None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
