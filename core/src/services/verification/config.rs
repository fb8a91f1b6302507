//! Configuration for the token verification service

use authapi_shared::config::VerificationConfig;
use chrono::Duration;

use crate::domain::entities::verification_token::{
    TokenPurpose, EMAIL_VERIFICATION_TTL_HOURS, PASSWORD_RESET_TTL_MINUTES,
};

/// Configuration for the token verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Lifetime of password reset tokens
    pub password_reset_ttl: Duration,
    /// Lifetime of email verification tokens
    pub email_verification_ttl: Duration,
    /// Longest secret accepted by `validate`; longer input is treated as unknown
    pub max_secret_length: usize,
}

impl VerificationServiceConfig {
    /// Default lifetime for tokens of the given purpose
    pub fn ttl_for(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::PasswordReset => self.password_reset_ttl,
            TokenPurpose::EmailVerification => self.email_verification_ttl,
        }
    }
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            password_reset_ttl: Duration::minutes(PASSWORD_RESET_TTL_MINUTES),
            email_verification_ttl: Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            max_secret_length: 256,
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        let defaults = Self::default();
        Self {
            password_reset_ttl: Duration::try_minutes(config.password_reset_ttl_minutes)
                .filter(|ttl| *ttl > Duration::zero())
                .unwrap_or(defaults.password_reset_ttl),
            email_verification_ttl: Duration::try_hours(config.email_verification_ttl_hours)
                .filter(|ttl| *ttl > Duration::zero())
                .unwrap_or(defaults.email_verification_ttl),
            ..defaults
        }
    }
}
