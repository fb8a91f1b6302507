//! Account recovery route handlers
//!
//! Password reset and email confirmation endpoints under `/api/user`.

pub mod reset_password;
pub mod send_reset_password_email;
pub mod send_verification_email;
pub mod verify_email;

use std::sync::Arc;

use authapi_core::repositories::{UserRepository, VerificationTokenRepository};
use authapi_core::services::{AccountRecoveryService, Clock, EmailServiceTrait};

/// Application state that holds shared services
pub struct AppState<U, R, C, E>
where
    U: UserRepository,
    R: VerificationTokenRepository,
    C: Clock,
    E: EmailServiceTrait,
{
    pub recovery: Arc<AccountRecoveryService<U, R, C, E>>,
    /// Echo recovery links in responses (development only)
    pub expose_links: bool,
}

impl<U, R, C, E> AppState<U, R, C, E>
where
    U: UserRepository,
    R: VerificationTokenRepository,
    C: Clock,
    E: EmailServiceTrait,
{
    pub fn new(recovery: Arc<AccountRecoveryService<U, R, C, E>>, expose_links: bool) -> Self {
        Self {
            recovery,
            expose_links,
        }
    }
}
