//! Shared types for the table booking service
//!
//! Models, error codes and the error body used by
//! booking-server and any UI shell talking to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
