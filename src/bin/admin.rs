use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use online_customer::admin::{build_router, AppState};
use online_customer::config::Settings;
use online_customer::db;
use online_customer::notifier::Notifier;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();

    info!("Initializing database at: {}", settings.database_url);
    let pool = db::connect(&settings.database_url).await?;
    db::init_database_schema(&pool).await?;

    let notifier = Notifier::from_settings(&settings);
    let addr = settings.admin_addr();
    let state = AppState::new(pool, settings, notifier);
    let app = build_router(state);

    info!("Admin service listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
