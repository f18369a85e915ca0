//! Server state

use std::sync::Arc;

use crate::core::Config;
use crate::db::DbService;
use crate::services::notify::{self, Notifier, NotifySummary};
use crate::services::order_intake::{BuyerDetails, ChatIdentity, PlacedOrder};
use crate::utils::AppError;

/// State shared by HTTP handlers and the chat front door
///
/// Cloning is cheap: every field is a handle.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    /// Outbound client for the image relay, bounded by `img_fetch_timeout`
    pub http: reqwest::Client,
    pub notifier: Arc<dyn Notifier>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.img_fetch_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            db,
            http,
            notifier,
        })
    }

    /// Push a placed order to every operator chat
    ///
    /// Never fails: undelivered recipients are logged and counted.
    pub async fn notify_order(
        &self,
        order: &PlacedOrder,
        buyer: &BuyerDetails,
        chat: Option<&ChatIdentity>,
    ) -> NotifySummary {
        if self.config.admin_chat_ids.is_empty() {
            tracing::debug!(order_id = order.order_id, "No operator chats configured");
            return NotifySummary::default();
        }

        let text = notify::format_order_notification(order, buyer, chat);
        let summary = notify::notify_operators(
            self.notifier.clone(),
            &self.config.admin_chat_ids,
            &text,
            self.config.notify_timeout,
        )
        .await;

        if summary.failed > 0 {
            tracing::warn!(
                order_id = order.order_id,
                delivered = summary.delivered,
                failed = summary.failed,
                "Order notification partially undelivered"
            );
        }
        summary
    }
}
