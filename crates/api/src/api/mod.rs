// HTTP API routes
//
// Each submodule handles a specific resource type with its own AppState.

pub mod common;
pub mod participants;
pub mod webhook;

// Re-export common types
pub use common::{ApiError, ApiResult, ErrorResponse, MessageResponse};
