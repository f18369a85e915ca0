use std::sync::Arc;

use storefront::services::notify::TelegramNotifier;
use storefront::{Config, DbService, ServerState, api, bot, init_logger_with_file};
use teloxide::Bot;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(&log_level, log_dir.as_deref());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return Err(e);
        }
    };
    tracing::info!(
        title = %config.store_title,
        operators = config.admin_chat_ids.len(),
        "Starting storefront"
    );

    let db = DbService::new(&config.db_path).await?;
    let bot = Bot::new(&config.bot_token);
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let state = ServerState::new(config, db, notifier)?;

    let http_addr = format!("0.0.0.0:{}", state.config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("HTTP listening on {http_addr}");

    let app = api::build_app(state.clone());
    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("HTTP server error: {e}");
        }
    });

    // Returns on Ctrl-C
    bot::run(bot, state).await;
    http_handle.abort();

    Ok(())
}
