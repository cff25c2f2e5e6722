//! Environment-backed configuration shared by every binary.

use std::env;

/// Runtime settings, read once at startup from the process environment
/// (a `.env` file is loaded by each binary before this is built).
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite database URL, e.g. `sqlite:online_customer.db`.
    pub database_url: String,
    /// Admin panel credentials.
    pub admin_username: String,
    pub admin_password: String,
    /// Bot token; `None` disables everything Telegram-side.
    pub bot_token: Option<String>,
    /// Operator chat that receives order notifications.
    pub operator_chat_id: Option<i64>,
    /// Bind address for the admin service.
    pub host: String,
    pub admin_port: u16,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:online_customer.db".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            bot_token: env::var("BOT_TOKEN")
                .or_else(|_| env::var("TELEGRAM_BOT_TOKEN"))
                .ok(),
            operator_chat_id: env::var("TELEGRAM_CHAT_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            admin_port: env::var("ADMIN_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }

    /// Address the admin service listens on.
    pub fn admin_addr(&self) -> String {
        format!("{}:{}", self.host, self.admin_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_addr_formatting() {
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            bot_token: None,
            operator_chat_id: None,
            host: "127.0.0.1".to_string(),
            admin_port: 8000,
        };
        assert_eq!(settings.admin_addr(), "127.0.0.1:8000");
    }
}
