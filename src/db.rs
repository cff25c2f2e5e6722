//! Database access layer: schema initialization and the CRUD operations used
//! by the bot, the admin service and the mini-app API.
//!
//! Every function takes a shared [`SqlitePool`] and returns
//! [`anyhow::Result`]; reads that can miss return `Option`, updates and
//! deletes report whether a row was touched.

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::models::{
    Category, CategoryInput, Discount, DiscountInput, NewOrder, Order, OrderItemDetail,
    OrderStatus, OrderSummary, Product, ProductInput, Receipt, Restaurant, RestaurantInput, User,
};

/// Open (and create if missing) the database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL: {database_url}"))?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("Failed to connect to database")
}

/// Initialize the database schema. Idempotent; run by every binary on startup.
pub async fn init_database_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            telegram_id TEXT NOT NULL UNIQUE,
            name TEXT,
            phone TEXT,
            is_subscribed BOOLEAN NOT NULL DEFAULT 1,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS restaurants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create restaurants table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            restaurant_id INTEGER REFERENCES restaurants(id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create categories table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            category_id INTEGER REFERENCES categories(id),
            restaurant_id INTEGER REFERENCES restaurants(id),
            price REAL NOT NULL,
            discount_price REAL,
            size TEXT,
            photo TEXT,
            is_available BOOLEAN NOT NULL DEFAULT 1,
            stock INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create products table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS discounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            date_start DATETIME,
            date_end DATETIME,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            category_id INTEGER REFERENCES categories(id),
            product_id INTEGER REFERENCES products(id),
            restaurant_id INTEGER REFERENCES restaurants(id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create discounts table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER REFERENCES users(id),
            restaurant_id INTEGER REFERENCES restaurants(id),
            status TEXT NOT NULL DEFAULT 'new',
            total REAL NOT NULL,
            phone TEXT,
            admin_comment TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            paid_at DATETIME
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create orders table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS order_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL REFERENCES orders(id),
            product_id INTEGER REFERENCES products(id),
            quantity INTEGER NOT NULL,
            price REAL NOT NULL,
            discount_price REAL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create order_items table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS receipts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL REFERENCES orders(id),
            file_path TEXT NOT NULL,
            uploaded_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create receipts table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub async fn get_user_by_telegram_id(pool: &SqlitePool, telegram_id: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE telegram_id = ?1")
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
        .context("Failed to read user")
}

pub async fn create_user(
    pool: &SqlitePool,
    telegram_id: &str,
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<User> {
    info!("Creating user for telegram_id: {telegram_id}");

    let id = sqlx::query(
        "INSERT INTO users (telegram_id, name, phone, is_subscribed, created_at)
         VALUES (?1, ?2, ?3, 1, ?4)",
    )
    .bind(telegram_id)
    .bind(name)
    .bind(phone)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to insert user")?
    .last_insert_rowid();

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
        .context("Failed to re-read created user")
}

/// Look the user up by telegram id, creating the row on first contact.
pub async fn get_or_create_user(
    pool: &SqlitePool,
    telegram_id: &str,
    name: Option<&str>,
) -> Result<User> {
    if let Some(user) = get_user_by_telegram_id(pool, telegram_id).await? {
        return Ok(user);
    }
    create_user(pool, telegram_id, name, None).await
}

pub async fn update_user_phone(pool: &SqlitePool, telegram_id: &str, phone: &str) -> Result<bool> {
    let rows_affected = sqlx::query("UPDATE users SET phone = ?1 WHERE telegram_id = ?2")
        .bind(phone)
        .bind(telegram_id)
        .execute(pool)
        .await
        .context("Failed to update user phone")?
        .rows_affected();
    Ok(rows_affected > 0)
}

// ---------------------------------------------------------------------------
// Restaurants
// ---------------------------------------------------------------------------

pub async fn list_restaurants(pool: &SqlitePool) -> Result<Vec<Restaurant>> {
    sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list restaurants")
}

pub async fn get_restaurant(pool: &SqlitePool, id: i64) -> Result<Option<Restaurant>> {
    sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to read restaurant")
}

pub async fn create_restaurant(pool: &SqlitePool, input: &RestaurantInput) -> Result<i64> {
    info!("Creating restaurant: {}", input.name);

    let id = sqlx::query("INSERT INTO restaurants (name, address) VALUES (?1, ?2)")
        .bind(&input.name)
        .bind(&input.address)
        .execute(pool)
        .await
        .context("Failed to insert restaurant")?
        .last_insert_rowid();
    Ok(id)
}

pub async fn update_restaurant(
    pool: &SqlitePool,
    id: i64,
    input: &RestaurantInput,
) -> Result<bool> {
    let rows_affected = sqlx::query("UPDATE restaurants SET name = ?1, address = ?2 WHERE id = ?3")
        .bind(&input.name)
        .bind(&input.address)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update restaurant")?
        .rows_affected();
    Ok(rows_affected > 0)
}

/// Delete a restaurant, nulling `restaurant_id` on every dependent row
/// (orders, products, categories, discounts) instead of cascading deletes.
pub async fn delete_restaurant(pool: &SqlitePool, id: i64) -> Result<bool> {
    info!("Deleting restaurant with ID: {id}");

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query("UPDATE orders SET restaurant_id = NULL WHERE restaurant_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach orders")?;
    sqlx::query("UPDATE products SET restaurant_id = NULL WHERE restaurant_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach products")?;
    sqlx::query("UPDATE categories SET restaurant_id = NULL WHERE restaurant_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach categories")?;
    sqlx::query("UPDATE discounts SET restaurant_id = NULL WHERE restaurant_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to detach discounts")?;

    let rows_affected = sqlx::query("DELETE FROM restaurants WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete restaurant")?
        .rows_affected();

    tx.commit().await.context("Failed to commit delete")?;
    Ok(rows_affected > 0)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list categories")
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to read category")
}

pub async fn create_category(pool: &SqlitePool, input: &CategoryInput) -> Result<i64> {
    let id = sqlx::query("INSERT INTO categories (name, restaurant_id) VALUES (?1, ?2)")
        .bind(&input.name)
        .bind(input.restaurant_id)
        .execute(pool)
        .await
        .context("Failed to insert category")?
        .last_insert_rowid();
    Ok(id)
}

pub async fn update_category(pool: &SqlitePool, id: i64, input: &CategoryInput) -> Result<bool> {
    let rows_affected =
        sqlx::query("UPDATE categories SET name = ?1, restaurant_id = ?2 WHERE id = ?3")
            .bind(&input.name)
            .bind(input.restaurant_id)
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to update category")?
            .rows_affected();
    Ok(rows_affected > 0)
}

pub async fn delete_category(pool: &SqlitePool, id: i64) -> Result<bool> {
    let rows_affected = sqlx::query("DELETE FROM categories WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete category")?
        .rows_affected();
    Ok(rows_affected > 0)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list products")
}

/// Products a customer can order right now from the given restaurant.
pub async fn list_products_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> Result<Vec<Product>> {
    sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE restaurant_id = ?1 AND is_available = 1 ORDER BY name",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
    .context("Failed to list restaurant products")
}

pub async fn get_product(pool: &SqlitePool, id: i64) -> Result<Option<Product>> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to read product")
}

pub async fn create_product(pool: &SqlitePool, input: &ProductInput) -> Result<i64> {
    info!("Creating product: {}", input.name);

    let id = sqlx::query(
        "INSERT INTO products
            (name, description, category_id, restaurant_id, price, discount_price,
             size, photo, is_available, stock)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.category_id)
    .bind(input.restaurant_id)
    .bind(input.price)
    .bind(input.discount_price)
    .bind(&input.size)
    .bind(&input.photo)
    .bind(input.is_available)
    .bind(input.stock)
    .execute(pool)
    .await
    .context("Failed to insert product")?
    .last_insert_rowid();
    Ok(id)
}

pub async fn update_product(pool: &SqlitePool, id: i64, input: &ProductInput) -> Result<bool> {
    let rows_affected = sqlx::query(
        "UPDATE products SET
            name = ?1, description = ?2, category_id = ?3, restaurant_id = ?4,
            price = ?5, discount_price = ?6, size = ?7, photo = ?8,
            is_available = ?9, stock = ?10
         WHERE id = ?11",
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.category_id)
    .bind(input.restaurant_id)
    .bind(input.price)
    .bind(input.discount_price)
    .bind(&input.size)
    .bind(&input.photo)
    .bind(input.is_available)
    .bind(input.stock)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update product")?
    .rows_affected();
    Ok(rows_affected > 0)
}

pub async fn delete_product(pool: &SqlitePool, id: i64) -> Result<bool> {
    let rows_affected = sqlx::query("DELETE FROM products WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete product")?
        .rows_affected();
    Ok(rows_affected > 0)
}

// ---------------------------------------------------------------------------
// Discounts
// ---------------------------------------------------------------------------

pub async fn list_discounts(pool: &SqlitePool) -> Result<Vec<Discount>> {
    sqlx::query_as::<_, Discount>("SELECT * FROM discounts ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list discounts")
}

pub async fn list_active_discounts(pool: &SqlitePool) -> Result<Vec<Discount>> {
    sqlx::query_as::<_, Discount>("SELECT * FROM discounts WHERE is_active = 1 ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list active discounts")
}

pub async fn list_active_discounts_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> Result<Vec<Discount>> {
    sqlx::query_as::<_, Discount>(
        "SELECT * FROM discounts WHERE restaurant_id = ?1 AND is_active = 1 ORDER BY id",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
    .context("Failed to list active discounts")
}

pub async fn get_discount(pool: &SqlitePool, id: i64) -> Result<Option<Discount>> {
    sqlx::query_as::<_, Discount>("SELECT * FROM discounts WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to read discount")
}

pub async fn create_discount(pool: &SqlitePool, input: &DiscountInput) -> Result<i64> {
    info!("Creating discount: {}", input.title);

    let id = sqlx::query(
        "INSERT INTO discounts
            (title, description, date_start, date_end, is_active,
             category_id, product_id, restaurant_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.date_start)
    .bind(input.date_end)
    .bind(input.is_active)
    .bind(input.category_id)
    .bind(input.product_id)
    .bind(input.restaurant_id)
    .execute(pool)
    .await
    .context("Failed to insert discount")?
    .last_insert_rowid();
    Ok(id)
}

pub async fn update_discount(pool: &SqlitePool, id: i64, input: &DiscountInput) -> Result<bool> {
    let rows_affected = sqlx::query(
        "UPDATE discounts SET
            title = ?1, description = ?2, date_start = ?3, date_end = ?4,
            is_active = ?5, category_id = ?6, product_id = ?7, restaurant_id = ?8
         WHERE id = ?9",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.date_start)
    .bind(input.date_end)
    .bind(input.is_active)
    .bind(input.category_id)
    .bind(input.product_id)
    .bind(input.restaurant_id)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update discount")?
    .rows_affected();
    Ok(rows_affected > 0)
}

pub async fn set_discount_active(pool: &SqlitePool, id: i64, is_active: bool) -> Result<bool> {
    let rows_affected = sqlx::query("UPDATE discounts SET is_active = ?1 WHERE id = ?2")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to toggle discount")?
        .rows_affected();
    Ok(rows_affected > 0)
}

pub async fn delete_discount(pool: &SqlitePool, id: i64) -> Result<bool> {
    let rows_affected = sqlx::query("DELETE FROM discounts WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete discount")?
        .rows_affected();
    Ok(rows_affected > 0)
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Persist an order and all of its snapshot lines in a single transaction.
/// Item prices come from the caller and are never recomputed here.
pub async fn create_order(pool: &SqlitePool, new_order: &NewOrder) -> Result<i64> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let order_id = sqlx::query(
        "INSERT INTO orders (user_id, restaurant_id, status, total, phone, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(new_order.user_id)
    .bind(new_order.restaurant_id)
    .bind(OrderStatus::New)
    .bind(new_order.total)
    .bind(&new_order.phone)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .context("Failed to insert order")?
    .last_insert_rowid();

    for item in &new_order.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price, discount_price)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.discount_price)
        .execute(&mut *tx)
        .await
        .context("Failed to insert order item")?;
    }

    tx.commit().await.context("Failed to commit order")?;
    info!(
        "Order {} created with {} item(s), total {}",
        order_id,
        new_order.items.len(),
        new_order.total
    );
    Ok(order_id)
}

const ORDER_SUMMARY_SELECT: &str = "SELECT o.id, o.user_id, o.restaurant_id, o.status, o.total,
        o.phone, o.created_at, o.paid_at,
        u.name AS user_name, r.name AS restaurant_name
     FROM orders o
     LEFT JOIN users u ON u.id = o.user_id
     LEFT JOIN restaurants r ON r.id = o.restaurant_id";

/// Newest-first order listing, optionally filtered by restaurant.
pub async fn list_orders(
    pool: &SqlitePool,
    restaurant_id: Option<i64>,
) -> Result<Vec<OrderSummary>> {
    let result = match restaurant_id {
        Some(id) => {
            let sql =
                format!("{ORDER_SUMMARY_SELECT} WHERE o.restaurant_id = ?1 ORDER BY o.created_at DESC");
            sqlx::query_as::<_, OrderSummary>(&sql)
                .bind(id)
                .fetch_all(pool)
                .await
        }
        None => {
            let sql = format!("{ORDER_SUMMARY_SELECT} ORDER BY o.created_at DESC");
            sqlx::query_as::<_, OrderSummary>(&sql).fetch_all(pool).await
        }
    };
    result.context("Failed to list orders")
}

/// The last three orders, for the admin dashboard.
pub async fn list_recent_orders(pool: &SqlitePool) -> Result<Vec<OrderSummary>> {
    let sql = format!("{ORDER_SUMMARY_SELECT} ORDER BY o.created_at DESC LIMIT 3");
    sqlx::query_as::<_, OrderSummary>(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to list recent orders")
}

pub async fn get_order(pool: &SqlitePool, id: i64) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to read order")
}

pub async fn list_order_items(pool: &SqlitePool, order_id: i64) -> Result<Vec<OrderItemDetail>> {
    sqlx::query_as::<_, OrderItemDetail>(
        "SELECT i.id, i.order_id, i.product_id, i.quantity, i.price, i.discount_price,
                p.name AS product_name
         FROM order_items i
         LEFT JOIN products p ON p.id = i.product_id
         WHERE i.order_id = ?1
         ORDER BY i.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
    .context("Failed to list order items")
}

/// Update an order's status. Only the transition to `paid` stamps `paid_at`;
/// every other status leaves the existing timestamp alone.
pub async fn update_order_status(
    pool: &SqlitePool,
    order_id: i64,
    status: OrderStatus,
) -> Result<bool> {
    info!("Updating order {order_id} status to {}", status.as_str());

    let result = if status == OrderStatus::Paid {
        sqlx::query("UPDATE orders SET status = ?1, paid_at = ?2 WHERE id = ?3")
            .bind(status)
            .bind(Utc::now())
            .bind(order_id)
            .execute(pool)
            .await
    } else {
        sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(order_id)
            .execute(pool)
            .await
    };

    Ok(result.context("Failed to update order status")?.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

pub async fn attach_receipt(pool: &SqlitePool, order_id: i64, file_path: &str) -> Result<i64> {
    let id = sqlx::query(
        "INSERT INTO receipts (order_id, file_path, uploaded_at) VALUES (?1, ?2, ?3)",
    )
    .bind(order_id)
    .bind(file_path)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to insert receipt")?
    .last_insert_rowid();
    Ok(id)
}

pub async fn get_receipt_by_order(pool: &SqlitePool, order_id: i64) -> Result<Option<Receipt>> {
    sqlx::query_as::<_, Receipt>("SELECT * FROM receipts WHERE order_id = ?1")
        .bind(order_id)
        .fetch_optional(pool)
        .await
        .context("Failed to read receipt")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> Result<SqlitePool> {
        // A single connection keeps every query on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        init_database_schema(&pool).await?;
        Ok(pool)
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent() -> Result<()> {
        let pool = setup_test_db().await?;
        init_database_schema(&pool).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_create_user_is_stable() -> Result<()> {
        let pool = setup_test_db().await?;

        let first = get_or_create_user(&pool, "42", Some("Alice")).await?;
        let second = get_or_create_user(&pool, "42", Some("Somebody Else")).await?;

        assert_eq!(first.id, second.id);
        assert_eq!(second.name.as_deref(), Some("Alice"));
        assert!(second.is_subscribed);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_phone() -> Result<()> {
        let pool = setup_test_db().await?;

        get_or_create_user(&pool, "42", Some("Alice")).await?;
        assert!(update_user_phone(&pool, "42", "+79990001122").await?);
        assert!(!update_user_phone(&pool, "777", "+79990001122").await?);

        let user = get_user_by_telegram_id(&pool, "42").await?.unwrap();
        assert_eq!(user.phone.as_deref(), Some("+79990001122"));
        Ok(())
    }

    #[tokio::test]
    async fn test_restaurant_crud() -> Result<()> {
        let pool = setup_test_db().await?;

        let input = RestaurantInput {
            name: "You Coffee".to_string(),
            address: "25 Kabardinskaya St".to_string(),
        };
        let id = create_restaurant(&pool, &input).await?;
        assert!(get_restaurant(&pool, id).await?.is_some());

        let updated = RestaurantInput {
            name: "You Coffee".to_string(),
            address: "1 New St".to_string(),
        };
        assert!(update_restaurant(&pool, id, &updated).await?);
        assert_eq!(
            get_restaurant(&pool, id).await?.unwrap().address,
            "1 New St"
        );

        assert!(delete_restaurant(&pool, id).await?);
        assert!(get_restaurant(&pool, id).await?.is_none());
        assert!(!delete_restaurant(&pool, id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_unavailable_products_hidden_from_menu() -> Result<()> {
        let pool = setup_test_db().await?;

        let restaurant_id = create_restaurant(
            &pool,
            &RestaurantInput {
                name: "Cafe".to_string(),
                address: "Somewhere".to_string(),
            },
        )
        .await?;

        for (name, available) in [("Espresso", true), ("Flat White", false)] {
            create_product(
                &pool,
                &ProductInput {
                    name: name.to_string(),
                    description: None,
                    category_id: None,
                    restaurant_id: Some(restaurant_id),
                    price: 100.0,
                    discount_price: None,
                    size: None,
                    photo: None,
                    is_available: available,
                    stock: 5,
                },
            )
            .await?;
        }

        let menu = list_products_by_restaurant(&pool, restaurant_id).await?;
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "Espresso");
        Ok(())
    }
}
