//! Types for account recovery results

use chrono::{DateTime, Utc};

/// Outcome of sending a recovery email
#[derive(Clone)]
pub struct RecoveryDispatch {
    /// Encoded user id embedded in the link
    pub uid: String,
    /// Link carrying the plaintext token
    pub link: String,
    /// Whether the email transport accepted the message
    pub delivered: bool,
    /// When the embedded token stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for RecoveryDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryDispatch")
            .field("uid", &self.uid)
            .field("link", &"[REDACTED]")
            .field("delivered", &self.delivered)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
