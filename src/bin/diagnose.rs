//! Connectivity probe for operators: checks the admin service and the
//! Telegram Bot API with the currently configured environment.

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use online_customer::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let settings = Settings::from_env();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    // Admin service liveness.
    let host = if settings.host == "0.0.0.0" {
        "127.0.0.1"
    } else {
        settings.host.as_str()
    };
    let health_url = format!("http://{host}:{}/health", settings.admin_port);
    match client.get(&health_url).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("✅ Admin service is up at {health_url}");
        }
        Ok(resp) => println!("⚠️ Admin service responded with {}", resp.status()),
        Err(e) => println!("❌ Admin service unreachable at {health_url}: {e}"),
    }

    // Telegram bot token.
    match &settings.bot_token {
        None => println!("⚠️ BOT_TOKEN is not set; skipping Telegram check"),
        Some(token) => {
            let url = format!("https://api.telegram.org/bot{token}/getMe");
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body: Value = resp.json().await?;
                    let username = body["result"]["username"].as_str().unwrap_or("<unknown>");
                    println!("✅ Telegram token is valid, bot @{username}");
                }
                Ok(resp) => {
                    println!("❌ Telegram rejected the token: HTTP {}", resp.status());
                }
                Err(e) => println!("❌ Telegram API unreachable: {e}"),
            }
        }
    }

    match settings.operator_chat_id {
        Some(chat_id) => println!("✅ Operator chat id configured: {chat_id}"),
        None => println!("⚠️ TELEGRAM_CHAT_ID is not set; order notifications are disabled"),
    }

    Ok(())
}
