//! Web-app order intake for the chat front door

use std::future::Future;

use super::{HandlerResult, texts};
use crate::core::ServerState;
use crate::services::order_intake::{self, BuyerDetails, ChatIdentity};

/// Place the order carried by a web-app payload and answer the sender
///
/// `reply` is called exactly once: with the confirmation when the order is
/// stored, with the "could not read order" text when the payload is not an
/// order or the cart is rejected. Operators are notified only after the
/// confirmation went out. Store failures are returned without a reply.
pub async fn process_web_app_order<F, Fut>(
    state: &ServerState,
    raw: &str,
    chat: Option<ChatIdentity>,
    reply: F,
) -> HandlerResult
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = HandlerResult>,
{
    let Some(req) = texts::parse_order_payload(raw) else {
        return reply(texts::ORDER_PARSE_FAILED.to_string()).await;
    };
    let buyer = BuyerDetails::from(&req);

    let placed = match order_intake::place_order(&state.db.pool, &buyer, chat.as_ref(), &req.items).await {
        Ok(placed) => placed,
        Err(e) if e.http_status().is_client_error() => {
            tracing::warn!(
                user_id = chat.as_ref().map(|c| c.user_id),
                error = %e,
                "Rejected web-app order"
            );
            return reply(texts::ORDER_PARSE_FAILED.to_string()).await;
        }
        Err(e) => return Err(e.into()),
    };

    reply(texts::order_confirmed(placed.order_id)).await?;
    state.notify_order(&placed, &buyer, chat.as_ref()).await;
    Ok(())
}
