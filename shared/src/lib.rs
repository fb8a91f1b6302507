//! Shared utilities and common types for the AuthApi server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response structures
//! - Utility functions (email validation, masking)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, LoggingConfig, ServerConfig, VerificationConfig,
};
pub use types::{ErrorResponse, HealthResponse, HealthStatus, MessageResponse};
pub use utils::validation;
