//! Catalog API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/config | GET | store title and hero asset |
//! | /api/categories | GET | category tiles |
//! | /api/subcategories?category= | GET | subcategory labels of one category |
//! | /api/products?category=&subcategory= | GET | active products, newest first |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/config", get(handler::config))
        .route("/api/categories", get(handler::categories))
        .route("/api/subcategories", get(handler::subcategories))
        .route("/api/products", get(handler::products))
}
