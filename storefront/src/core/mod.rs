//! Core module - configuration and shared server state
//!
//! - [`Config`] - environment configuration
//! - [`ServerState`] - state handed to HTTP handlers and the chat dispatcher

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
