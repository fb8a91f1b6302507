//! Verification token entity for email verification and password reset.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of random bytes in a token secret (256 bits)
pub const SECRET_BYTES: usize = 32;

/// Default lifetime of a password reset token (15 minutes)
pub const PASSWORD_RESET_TTL_MINUTES: i64 = 15;

/// Default lifetime of an email verification token (24 hours)
pub const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;

/// What a verification token authorizes
///
/// A token issued for one purpose never validates for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    /// Storage representation of the purpose
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }

    /// Default time-to-live for tokens of this purpose
    pub fn default_ttl(&self) -> Duration {
        match self {
            TokenPurpose::EmailVerification => Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            TokenPurpose::PasswordReset => Duration::minutes(PASSWORD_RESET_TTL_MINUTES),
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email_verification" => Ok(TokenPurpose::EmailVerification),
            "password_reset" => Ok(TokenPurpose::PasswordReset),
            _ => Err(format!("Unknown token purpose: {}", s)),
        }
    }
}

/// Single-use token bound to a subject and a purpose
///
/// Only the SHA-256 digest of the secret is kept; the plaintext secret leaves
/// the system once, inside [`IssuedToken`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    /// Unique identifier of the token record
    pub id: Uuid,

    /// Identifier of the user the token is bound to
    pub subject_id: String,

    /// What the token authorizes
    pub purpose: TokenPurpose,

    /// Hex-encoded SHA-256 digest of the secret
    pub secret_hash: String,

    /// Timestamp when the token was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the token is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been consumed (validated, expired or superseded)
    pub consumed: bool,

    /// Timestamp when the token was consumed
    pub consumed_at: Option<DateTime<Utc>>,
}

impl VerificationToken {
    /// Creates a new unconsumed token expiring `ttl` after `issued_at`
    ///
    /// The caller guarantees `ttl` is positive so that `expires_at > issued_at`.
    pub fn new(
        subject_id: impl Into<String>,
        purpose: TokenPurpose,
        secret_hash: String,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id: subject_id.into(),
            purpose,
            secret_hash,
            issued_at,
            expires_at: issued_at + ttl,
            consumed: false,
            consumed_at: None,
        }
    }

    /// Generates a fresh secret from the OS CSPRNG, encoded base64url without padding
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Hex-encoded SHA-256 digest of a secret
    pub fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Checks if the token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// A token is valid iff it is unconsumed and `now <= expires_at`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && !self.is_expired_at(now)
    }

    /// Whether the token belongs to the given subject, purpose and secret digest
    pub fn matches(&self, subject_id: &str, purpose: TokenPurpose, secret_hash: &str) -> bool {
        self.subject_id == subject_id
            && self.purpose == purpose
            && constant_time_eq(self.secret_hash.as_bytes(), secret_hash.as_bytes())
    }

    /// Marks the token as consumed
    ///
    /// Returns `false` if it was already consumed, leaving `consumed_at` untouched.
    pub fn consume(&mut self, now: DateTime<Utc>) -> bool {
        if self.consumed {
            return false;
        }
        self.consumed = true;
        self.consumed_at = Some(now);
        true
    }

    /// Time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

/// A freshly issued token together with its plaintext secret
#[derive(Clone)]
pub struct IssuedToken {
    /// Plaintext secret for out-of-band delivery to the user
    pub secret: String,

    /// The stored token record
    pub token: VerificationToken,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("secret", &"[REDACTED]")
            .field("token", &self.token)
            .finish()
    }
}
