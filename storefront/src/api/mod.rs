//! HTTP API
//!
//! - [`catalog`] - config, categories, subcategories, products
//! - [`orders`] - web order placement
//! - [`img`] - third-party image relay
//! - [`health`] - liveness
//! - [`web`] - bundled web client and static media

pub mod catalog;
pub mod health;
pub mod img;
pub mod orders;
pub mod web;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// All JSON routes (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(catalog::router())
        .merge(orders::router())
        .merge(img::router())
        .merge(health::router())
}

/// Fully configured application: routes, static files, middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .merge(web::router(&state.config))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
