//! Order API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/order | POST | place an order from the web view |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/order", post(handler::create))
}
