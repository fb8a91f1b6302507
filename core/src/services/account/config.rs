//! Configuration for the account recovery service

use authapi_shared::config::VerificationConfig;

/// Configuration for the account recovery service
#[derive(Debug, Clone)]
pub struct AccountRecoveryConfig {
    /// Frontend base URL, without a trailing slash
    pub frontend_base_url: String,
    /// Sender address of recovery emails
    pub email_from: String,
    /// bcrypt cost for new password hashes
    pub bcrypt_cost: u32,
}

impl Default for AccountRecoveryConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl From<&VerificationConfig> for AccountRecoveryConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            frontend_base_url: config.base_url().to_string(),
            email_from: config.email_from.clone(),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}
