//! Utilities - error types (from shared::error) and logging

pub mod logger;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
