//! Order API Handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use shared::models::{OrderPlaced, OrderRequest};

use crate::core::ServerState;
use crate::services::order_intake::{self, BuyerDetails};
use crate::utils::{AppError, AppResult};

/// POST /api/order - place a web order
///
/// Operators are notified after the order is committed; delivery
/// failures do not change the response.
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> AppResult<Json<OrderPlaced>> {
    let Json(req) = payload.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let buyer = BuyerDetails::from(&req);

    let placed = order_intake::place_order(&state.db.pool, &buyer, None, &req.items).await?;
    state.notify_order(&placed, &buyer, None).await;

    Ok(Json(OrderPlaced::new(placed.order_id)))
}
