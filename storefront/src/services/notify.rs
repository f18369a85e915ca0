//! Operator notifications
//!
//! Every placed order is pushed to the configured operator chats. Delivery
//! is best-effort: each recipient gets one attempt bounded by a timeout,
//! failures are logged and never reach the order placement result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html::escape;
use tokio::task::JoinSet;

use super::order_intake::{BuyerDetails, ChatIdentity, PlacedOrder};

const PLACEHOLDER: &str = "—";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),
}

/// Outbound channel to a chat recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one HTML-formatted message
    async fn send_html(&self, chat_id: i64, text: &str) -> Result<(), NotifyError>;
}

/// [`Notifier`] backed by the chat bot API
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_html(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifySummary {
    pub delivered: usize,
    pub failed: usize,
}

fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => escape(v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render the operator message for a placed order
pub fn format_order_notification(
    order: &PlacedOrder,
    buyer: &BuyerDetails,
    chat: Option<&ChatIdentity>,
) -> String {
    let username = chat
        .and_then(|c| c.username.as_deref())
        .filter(|u| !u.is_empty())
        .map(|u| format!("@{}", escape(u)))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let profile = chat
        .map(|c| format!("<a href='tg://user?id={}'>профиль</a>", c.user_id))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let items = if order.lines.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        order
            .lines
            .iter()
            .map(|line| {
                let size = if line.size.is_empty() {
                    PLACEHOLDER.to_string()
                } else {
                    escape(&line.size)
                };
                format!(
                    "• {} [{}] × {} — {} ₽",
                    escape(&line.title),
                    size,
                    line.qty,
                    line.line_total().map_or_else(|| PLACEHOLDER.to_string(), |t| t.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "<b>Новый заказ #{order_id}</b>\n\
         Клиент: <b>{full_name}</b> {username} ({profile})\n\
         Телефон: <b>{phone}</b>\n\
         СДЭК/адрес: <b>{address}</b>\n\
         Telegram: <b>{telegram}</b>\n\
         Комментарий: {comment}\n\
         Сумма: <b>{total} ₽</b>\n\n\
         {items}",
        order_id = order.order_id,
        full_name = or_placeholder(buyer.full_name.as_deref()),
        phone = or_placeholder(buyer.phone.as_deref()),
        address = or_placeholder(buyer.address.as_deref()),
        telegram = or_placeholder(buyer.telegram.as_deref()),
        comment = or_placeholder(buyer.comment.as_deref()),
        total = order.total_price,
    )
}

/// Send `text` to every recipient concurrently, one bounded attempt each
///
/// The whole fan-out takes at most one `timeout`, whatever the number of
/// recipients.
pub async fn notify_operators(
    notifier: Arc<dyn Notifier>,
    recipients: &[i64],
    text: &str,
    timeout: Duration,
) -> NotifySummary {
    let text: Arc<str> = Arc::from(text);
    let mut tasks = JoinSet::new();
    for &chat_id in recipients {
        let notifier = notifier.clone();
        let text = text.clone();
        tasks.spawn(async move {
            let result = match tokio::time::timeout(timeout, notifier.send_html(chat_id, &text)).await {
                Ok(result) => result,
                Err(_) => Err(NotifyError::Timeout(timeout)),
            };
            (chat_id, result)
        });
    }

    let mut summary = NotifySummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => summary.delivered += 1,
            Ok((chat_id, Err(e))) => {
                tracing::error!(chat_id = chat_id, error = %e, "Operator notification failed");
                summary.failed += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Operator notification task failed");
                summary.failed += 1;
            }
        }
    }

    summary
}
