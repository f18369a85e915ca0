//! User-facing chat texts

use shared::models::OrderRequest;

/// Button target when no web-app URL is configured
pub const FALLBACK_WEBAPP_URL: &str = "https://example.com";

pub const ORDER_PARSE_FAILED: &str = "Не удалось прочитать данные заказа.";

pub const THANK_YOU: &str =
    "Спасибо за заказ! В скором времени с Вами свяжется менеджер и пришлет реквизиты для оплаты!";

pub fn greeting(store_title: &str) -> String {
    format!(
        "{} — мини-магазин в Telegram. Открой витрину ниже:",
        store_title.to_uppercase()
    )
}

pub fn open_button(store_title: &str) -> String {
    format!("Открыть {}", store_title.to_uppercase())
}

pub fn order_confirmed(order_id: i64) -> String {
    format!("✅ Заказ №{order_id} оформлен.\n\n{THANK_YOU}")
}

/// Decode a web-app payload; `None` when it is not an order object
pub fn parse_order_payload(raw: &str) -> Option<OrderRequest> {
    match serde_json::from_str::<OrderRequest>(raw) {
        Ok(req) => Some(req),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable web-app payload");
            None
        }
    }
}
