//! Checkout-flow coverage at the library surface: the same cart snapshot and
//! persistence steps the message handlers run, minus a live Telegram bot.

use anyhow::Result;
use online_customer::bot::{count_cart, render_cart_summary, snapshot_cart, SelectedRestaurant};
use online_customer::db;
use online_customer::models::{NewOrder, NewOrderItem, ProductInput, RestaurantInput};
use online_customer::phone::normalize_phone;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn setup_test_db() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    db::init_database_schema(&pool).await?;
    Ok(pool)
}

#[tokio::test]
async fn test_checkout_snapshots_cart_against_menu() -> Result<()> {
    let pool = setup_test_db().await?;

    let restaurant_id = db::create_restaurant(
        &pool,
        &RestaurantInput {
            name: "You Coffee".to_string(),
            address: "25 Kabardinskaya St".to_string(),
        },
    )
    .await?;
    for (name, price, discount_price) in [
        ("Cappuccino", 210.0, Some(190.0)),
        ("Croissant", 180.0, None),
    ] {
        db::create_product(
            &pool,
            &ProductInput {
                name: name.to_string(),
                description: None,
                category_id: None,
                restaurant_id: Some(restaurant_id),
                price,
                discount_price,
                size: None,
                photo: None,
                is_available: true,
                stock: 10,
            },
        )
        .await?;
    }

    // The cart the customer taps together: a multiset of names, including
    // one that matches nothing on the menu.
    let cart = vec![
        "Cappuccino".to_string(),
        "Croissant".to_string(),
        "Cappuccino".to_string(),
        "Not on the menu".to_string(),
    ];

    let menu = db::list_products_by_restaurant(&pool, restaurant_id).await?;
    let pending = snapshot_cart(&menu, &cart);

    assert_eq!(pending.items.len(), 2);
    assert_eq!(pending.total, 190.0 * 2.0 + 180.0);

    // Persisting the snapshot produces one row per resolved line.
    let user = db::get_or_create_user(&pool, "42", Some("Alice")).await?;
    let order_id = db::create_order(
        &pool,
        &NewOrder {
            user_id: Some(user.id),
            restaurant_id: Some(restaurant_id),
            total: pending.total,
            phone: Some("+79991234567".to_string()),
            items: pending
                .items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                    discount_price: item.discount_price,
                })
                .collect(),
        },
    )
    .await?;

    let items = db::list_order_items(&pool, order_id).await?;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_name.as_deref(), Some("Cappuccino"));
    assert_eq!(items[0].quantity, 2);
    Ok(())
}

#[test]
fn test_cart_counting_is_a_multiset() {
    let cart = vec![
        "Latte".to_string(),
        "Latte".to_string(),
        "Eclair".to_string(),
        "Latte".to_string(),
    ];
    assert_eq!(
        count_cart(&cart),
        vec![("Latte".to_string(), 3), ("Eclair".to_string(), 1)]
    );
}

#[test]
fn test_cart_summary_mentions_restaurant_and_total() {
    let restaurant = SelectedRestaurant {
        id: 1,
        name: "You Coffee".to_string(),
        address: "25 Kabardinskaya St".to_string(),
    };
    let pending = snapshot_cart(&[], &[]);
    let text = render_cart_summary(&restaurant, &pending);
    assert!(text.contains("You Coffee"));
    assert!(text.contains("Total: 0₽"));
}

#[test]
fn test_phone_normalization_variants() {
    for input in [
        "+79991234567",
        "89991234567",
        "79991234567",
        "9991234567",
        "8 (999) 123-45-67",
    ] {
        assert_eq!(
            normalize_phone(input).unwrap(),
            "+79991234567",
            "input: {input}"
        );
    }
    assert!(normalize_phone("call me maybe").is_err());
    assert!(normalize_phone("+1 555 0100").is_err());
}
