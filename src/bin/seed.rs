//! Loads demo data: two cafes, three categories and a small menu.
//! Run once against a fresh database; running it twice duplicates rows.

use anyhow::Result;
use log::info;

use online_customer::config::Settings;
use online_customer::db;
use online_customer::models::{CategoryInput, ProductInput, RestaurantInput};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();
    let settings = Settings::from_env();

    let pool = db::connect(&settings.database_url).await?;
    db::init_database_schema(&pool).await?;

    let cafe_id = db::create_restaurant(
        &pool,
        &RestaurantInput {
            name: "You Coffee (Nalchik)".to_string(),
            address: "25 Kabardinskaya St, Nalchik".to_string(),
        },
    )
    .await?;
    db::create_restaurant(
        &pool,
        &RestaurantInput {
            name: "Coffee House (Moscow)".to_string(),
            address: "15 Arbat St, Moscow".to_string(),
        },
    )
    .await?;

    let mut category_ids = Vec::new();
    for name in ["Drinks", "Breakfast", "Desserts"] {
        let id = db::create_category(
            &pool,
            &CategoryInput {
                name: name.to_string(),
                restaurant_id: Some(cafe_id),
            },
        )
        .await?;
        category_ids.push(id);
    }

    let menu: [(&str, &str, i64, f64, &str); 6] = [
        ("Cappuccino", "Coffee with milk", 0, 150.0, "250 ml"),
        ("Americano", "Classic black coffee", 0, 120.0, "250 ml"),
        ("Cheese omelet", "A hearty omelet", 1, 250.0, "200 g"),
        ("Oatmeal", "Porridge done right", 1, 180.0, "300 g"),
        ("Cheesecake", "A delicate dessert", 2, 220.0, "120 g"),
        ("Eclair", "A French classic", 2, 90.0, "80 g"),
    ];
    for (name, description, category, price, size) in menu {
        db::create_product(
            &pool,
            &ProductInput {
                name: name.to_string(),
                description: Some(description.to_string()),
                category_id: Some(category_ids[category as usize]),
                restaurant_id: Some(cafe_id),
                price,
                discount_price: None,
                size: Some(size.to_string()),
                photo: None,
                is_available: true,
                stock: 10,
            },
        )
        .await?;
    }

    info!("Seed data loaded");
    println!("Seed data loaded: 2 restaurants, 3 categories, 6 products");
    Ok(())
}
