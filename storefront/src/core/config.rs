//! Service configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const DEFAULT_STORE_TITLE: &str = "LAYOUTPLACE Shop";

/// Service configuration - everything the process reads from its environment
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BOT_TOKEN | (required) | chat bot credential |
/// | PORT | 8000 | HTTP listen port |
/// | STORE_TITLE | LAYOUTPLACE Shop | store display title |
/// | DB_PATH | data.sqlite | SQLite database file |
/// | ADMIN_CHAT_IDS | (empty) | comma separated operator chat ids |
/// | WEBAPP_URL | (empty) | public base URL of the web client |
/// | WEB_DIR | web | bundled web client directory |
/// | IMAGES_DIR | images | static media directory |
/// | IMG_FETCH_TIMEOUT_MS | 10000 | outbound image fetch timeout |
/// | NOTIFY_TIMEOUT_MS | 5000 | per-recipient notification timeout |
///
/// `LOG_LEVEL` (default `info`) and `LOG_DIR` are read by `main` to set up
/// logging before this struct is built.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub http_port: u16,
    pub store_title: String,
    pub db_path: String,
    /// Operator recipients of order notifications
    pub admin_chat_ids: Vec<i64>,
    /// Normalized web-app URL (`https://host/web/`), `None` when not configured
    pub webapp_url: Option<String>,
    pub web_dir: String,
    pub images_dir: String,
    pub img_fetch_timeout: Duration,
    pub notify_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Fails when `BOT_TOKEN` is missing or blank.
    pub fn from_env() -> Result<Self, BoxError> {
        let bot_token = std::env::var("BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        if bot_token.is_empty() {
            return Err("BOT_TOKEN must be set".into());
        }

        Ok(Self {
            bot_token,
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8000),
            store_title: std::env::var("STORE_TITLE")
                .ok()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_STORE_TITLE.into()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "data.sqlite".into()),
            admin_chat_ids: parse_chat_ids(&std::env::var("ADMIN_CHAT_IDS").unwrap_or_default()),
            webapp_url: normalize_webapp_url(&std::env::var("WEBAPP_URL").unwrap_or_default()),
            web_dir: std::env::var("WEB_DIR").unwrap_or_else(|_| "web".into()),
            images_dir: std::env::var("IMAGES_DIR").unwrap_or_else(|_| "images".into()),
            img_fetch_timeout: Duration::from_millis(
                std::env::var("IMG_FETCH_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10_000),
            ),
            notify_timeout: Duration::from_millis(
                std::env::var("NOTIFY_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5_000),
            ),
        })
    }
}

/// Parse `ADMIN_CHAT_IDS`: blank tokens are skipped, bad tokens are skipped with a warning
pub fn parse_chat_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(item = %part, "Skip bad ADMIN_CHAT_IDS item");
                None
            }
        })
        .collect()
}

/// Normalize `WEBAPP_URL` into the URL the chat button opens
///
/// `shop.example.com/` becomes `https://shop.example.com/web/`.
pub fn normalize_webapp_url(raw: &str) -> Option<String> {
    let base = raw.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    let base = if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("https://{}", base.trim_start_matches('/'))
    };
    Some(format!("{base}/web/"))
}
