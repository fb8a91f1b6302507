//! Verification token and recovery email configuration

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Costs accepted by bcrypt
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Upper bound for `PASSWORD_RESET_TTL_MINUTES` (30 days)
pub const MAX_PASSWORD_RESET_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Upper bound for `EMAIL_VERIFICATION_TTL_HOURS` (one year)
pub const MAX_EMAIL_VERIFICATION_TTL_HOURS: i64 = 365 * 24;

/// Configuration for password-reset and email-verification flows
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Lifetime of a password reset token in minutes
    pub password_reset_ttl_minutes: i64,

    /// Lifetime of an email verification token in hours
    pub email_verification_ttl_hours: i64,

    /// Base URL of the frontend that renders the reset/verify pages
    pub frontend_base_url: String,

    /// Sender address for outgoing recovery emails
    pub email_from: String,

    /// bcrypt cost used when storing a new password
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            password_reset_ttl_minutes: 15,
            email_verification_ttl_hours: 24,
            frontend_base_url: String::from("http://localhost:3000"),
            email_from: String::from("no-reply@authapi.local"),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            password_reset_ttl_minutes: std::env::var("PASSWORD_RESET_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| (1..=MAX_PASSWORD_RESET_TTL_MINUTES).contains(v))
                .unwrap_or(defaults.password_reset_ttl_minutes),
            email_verification_ttl_hours: std::env::var("EMAIL_VERIFICATION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| (1..=MAX_EMAIL_VERIFICATION_TTL_HOURS).contains(v))
                .unwrap_or(defaults.email_verification_ttl_hours),
            frontend_base_url: std::env::var("FRONTEND_BASE_URL")
                .unwrap_or(defaults.frontend_base_url),
            email_from: std::env::var("EMAIL_FROM").unwrap_or(defaults.email_from),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u32| BCRYPT_COST_RANGE.contains(v))
                .unwrap_or(defaults.bcrypt_cost),
        }
    }

    /// Frontend base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.frontend_base_url.trim_end_matches('/')
    }
}

fn default_bcrypt_cost() -> u32 {
    12
}
