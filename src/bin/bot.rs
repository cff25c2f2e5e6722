use anyhow::Result;
use log::{info, warn};
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;

use online_customer::bot::{message_handler, OrderState};
use online_customer::config::Settings;
use online_customer::db;
use online_customer::notifier::Notifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting Online Customer Telegram bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();
    let settings = Settings::from_env();

    let bot_token = settings
        .bot_token
        .clone()
        .expect("BOT_TOKEN must be set");

    info!("Initializing database at: {}", settings.database_url);
    let pool = db::connect(&settings.database_url).await?;
    db::init_database_schema(&pool).await?;

    let bot = Bot::new(bot_token);

    // Operator notifications reuse the same bot; orders still go through
    // without a configured operator chat.
    let notifier = match settings.operator_chat_id {
        Some(chat_id) => Some(Notifier::new(bot.clone(), ChatId(chat_id))),
        None => {
            warn!("TELEGRAM_CHAT_ID not set; operator notifications disabled");
            None
        }
    };

    info!("Bot initialized, starting dispatcher");

    let handler = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<OrderState>, OrderState>()
        .endpoint(message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<OrderState>::new(),
            pool,
            notifier
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
