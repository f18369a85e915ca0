//! Shared types for the storefront
//!
//! Wire models exchanged with the web client and the chat web-app, plus
//! the unified error types used by every HTTP handler.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
