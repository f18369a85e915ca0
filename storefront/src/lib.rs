//! Storefront - catalog and order service for a chat-based shop
//!
//! ```text
//! storefront/src/
//! ├── core/       # configuration, shared state
//! ├── db/         # SQLite pool, migrations, repositories
//! ├── services/   # catalog, order intake, notifications, image relay
//! ├── api/        # HTTP routes and handlers
//! ├── bot/        # chat commands and web-app payloads
//! └── utils/      # error re-exports, logging
//! ```

pub mod api;
pub mod bot;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use crate::core::{Config, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};

pub use utils::logger::init_logger_with_file;
