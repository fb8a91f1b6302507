//! Main token verification service implementation

use chrono::Duration;
use std::sync::Arc;
use tracing;

use crate::domain::entities::verification_token::{IssuedToken, TokenPurpose, VerificationToken};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::verification_token::VerificationTokenRepository;
use crate::services::clock::Clock;

use super::config::VerificationServiceConfig;

/// Longest subject identifier a token can be bound to
pub const MAX_SUBJECT_ID_LENGTH: usize = 64;

/// Issues and validates single-use verification tokens
pub struct TokenVerificationService<R: VerificationTokenRepository, C: Clock> {
    /// Token store
    repository: Arc<R>,
    /// Time source for issue and expiry decisions
    clock: Arc<C>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<R: VerificationTokenRepository, C: Clock> TokenVerificationService<R, C> {
    /// Create a new token verification service
    ///
    /// # Arguments
    ///
    /// * `repository` - Token store implementation
    /// * `clock` - Time source
    /// * `config` - Service configuration
    pub fn new(repository: Arc<R>, clock: Arc<C>, config: VerificationServiceConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a new token for a subject and purpose
    ///
    /// This method:
    /// 1. Rejects a blank or overlong subject and a ttl that is not positive
    ///    or would overflow the expiry timestamp
    /// 2. Generates a fresh 256-bit secret
    /// 3. Stores the token digest, superseding live tokens for the same pair
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - The stored record plus the plaintext secret
    /// * `Err(DomainError)` - Invalid arguments or a storage failure
    pub async fn issue(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> DomainResult<IssuedToken> {
        if subject_id.trim().is_empty() {
            return Err(VerificationError::invalid_argument("subject_id must not be empty").into());
        }
        if subject_id.chars().count() > MAX_SUBJECT_ID_LENGTH {
            return Err(VerificationError::invalid_argument(format!(
                "subject_id must be at most {} characters",
                MAX_SUBJECT_ID_LENGTH
            ))
            .into());
        }
        if ttl <= Duration::zero() {
            return Err(VerificationError::invalid_argument("ttl must be positive").into());
        }

        let now = self.clock.now();
        if now.checked_add_signed(ttl).is_none() {
            return Err(VerificationError::invalid_argument("ttl out of range").into());
        }

        let secret = VerificationToken::generate_secret();
        let token = VerificationToken::new(
            subject_id,
            purpose,
            VerificationToken::hash_secret(&secret),
            now,
            ttl,
        );

        let superseded = self
            .repository
            .store_superseding(token.clone())
            .await
            .map_err(|e| {
                tracing::error!(
                    subject_id = subject_id,
                    purpose = %purpose,
                    error = %e,
                    event = "token_store_failed",
                    "Failed to store verification token"
                );
                e
            })?;

        tracing::info!(
            subject_id = subject_id,
            purpose = %purpose,
            token_id = %token.id,
            expires_at = %token.expires_at,
            superseded = superseded,
            event = "token_issued",
            "Issued verification token"
        );

        Ok(IssuedToken { secret, token })
    }

    /// Issue a token with the configured lifetime for its purpose
    pub async fn issue_with_default_ttl(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
    ) -> DomainResult<IssuedToken> {
        self.issue(subject_id, purpose, self.config.ttl_for(purpose)).await
    }

    /// Validate and consume a token
    ///
    /// A token passes only once. Expired tokens are consumed on detection and
    /// keep reporting `Expired` afterwards.
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationToken)` - The token, now consumed
    /// * `Err(DomainError::Verification(_))` - `NotFound`, `Expired` or `AlreadyConsumed`
    /// * `Err(DomainError)` - Storage failure
    pub async fn validate(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        secret: &str,
    ) -> DomainResult<VerificationToken> {
        if secret.is_empty() || secret.len() > self.config.max_secret_length {
            return Err(self.rejected(subject_id, purpose, VerificationError::NotFound));
        }

        let secret_hash = VerificationToken::hash_secret(secret);
        let mut token = match self
            .repository
            .find_by_secret_hash(subject_id, purpose, &secret_hash)
            .await?
        {
            Some(token) => token,
            None => return Err(self.rejected(subject_id, purpose, VerificationError::NotFound)),
        };

        let now = self.clock.now();

        if token.is_expired_at(now) {
            if !token.consumed {
                if let Err(e) = self.repository.consume(token.id, now).await {
                    tracing::warn!(
                        token_id = %token.id,
                        error = %e,
                        event = "expired_token_consume_failed",
                        "Failed to mark expired token as consumed"
                    );
                }
            }
            return Err(self.rejected(subject_id, purpose, VerificationError::Expired));
        }

        if token.consumed {
            return Err(self.rejected(subject_id, purpose, VerificationError::AlreadyConsumed));
        }

        // Another caller may have consumed it since the lookup
        if !self.repository.consume(token.id, now).await? {
            return Err(self.rejected(subject_id, purpose, VerificationError::AlreadyConsumed));
        }

        token.consume(now);

        tracing::info!(
            subject_id = subject_id,
            purpose = %purpose,
            token_id = %token.id,
            event = "token_consumed",
            "Verification token validated"
        );

        Ok(token)
    }

    /// Delete tokens that expired before now
    pub async fn purge_expired(&self) -> DomainResult<u64> {
        let deleted = self.repository.delete_expired(self.clock.now()).await?;
        tracing::debug!(deleted = deleted, event = "tokens_purged", "Purged expired tokens");
        Ok(deleted)
    }

    fn rejected(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        reason: VerificationError,
    ) -> DomainError {
        tracing::warn!(
            subject_id = subject_id,
            purpose = %purpose,
            reason = reason.code(),
            event = "token_rejected",
            "Verification token rejected"
        );
        DomainError::Verification(reason)
    }
}
