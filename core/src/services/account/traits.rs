//! Traits for email transport integration

use async_trait::async_trait;

/// An outgoing plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Trait for email service integration
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send an email, returning the provider message id
    async fn send_email(&self, message: &EmailMessage) -> Result<String, String>;
}
