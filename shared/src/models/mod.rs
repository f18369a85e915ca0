//! Data models
//!
//! Shared between the storefront service and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod order;
pub mod product;
pub mod store_config;

// Re-exports
pub use category::*;
pub use order::*;
pub use product::*;
pub use store_config::*;
