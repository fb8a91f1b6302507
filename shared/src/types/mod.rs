//! Type definitions module
//!
//! - `response` - API response wrappers and health checks

pub mod response;

pub use response::{ErrorResponse, HealthResponse, HealthStatus, MessageResponse};
