//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the AuthApi service.
//! It provides concrete implementations of the repository and transport
//! traits declared in `authapi_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL implementations using SQLx
//! - **Email**: Mail transport used by the recovery flows
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use authapi_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Email module - outgoing mail transports
pub mod email;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration for infrastructure services
    //!
    //! Re-exports the shared configuration types used by this crate.

    pub use authapi_shared::config::{DatabaseConfig, VerificationConfig};
}

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlUserRepository, MySqlVerificationTokenRepository};
pub use email::MockEmailService;

/// Load a `.env` file if present
///
/// Returns whether a file was found. Missing files are not an error.
pub fn load_dotenv() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded environment file");
            true
        }
        Err(_) => false,
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email transport error
    #[error("Email service error: {0}")]
    Email(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
