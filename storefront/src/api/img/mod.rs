//! Image relay API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /img?u=<absolute-url> | GET | fetch and relay a third-party image |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/img", get(handler::relay))
}
