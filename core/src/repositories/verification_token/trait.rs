//! Verification token repository trait defining the token store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use crate::errors::DomainError;

/// Repository trait for VerificationToken persistence operations
///
/// The token service relies on two guarantees from implementations:
/// - `store_superseding` inserts the new token and consumes every live token
///   for the same (subject, purpose) as one atomic step.
/// - `consume` is a conditional update guarded by the current `consumed`
///   value, so exactly one of several racing callers gets `Ok(true)`.
///
/// # Security Considerations
/// - Only secret digests are stored, never plaintext secrets
/// - Tokens are never deleted by the service; `delete_expired` exists for
///   external housekeeping
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// Store a new token, consuming all live tokens for its (subject, purpose)
    ///
    /// # Arguments
    /// * `token` - The freshly issued, unconsumed token
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of previously live tokens that were superseded
    /// * `Err(DomainError)` - Save failed (e.g., duplicate secret digest)
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use authapi_core::repositories::VerificationTokenRepository;
    /// # use authapi_core::domain::entities::{TokenPurpose, VerificationToken};
    /// # async fn example(repo: &impl VerificationTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let secret = VerificationToken::generate_secret();
    /// let token = VerificationToken::new(
    ///     "user-42",
    ///     TokenPurpose::PasswordReset,
    ///     VerificationToken::hash_secret(&secret),
    ///     Utc::now(),
    ///     Duration::minutes(15),
    /// );
    ///
    /// let superseded = repo.store_superseding(token).await?;
    /// println!("Superseded {} older tokens", superseded);
    /// # Ok(())
    /// # }
    /// ```
    async fn store_superseding(&self, token: VerificationToken) -> Result<u64, DomainError>;

    /// Find a token by subject, purpose and secret digest
    ///
    /// Consumed and expired tokens are returned too; the caller decides.
    ///
    /// # Returns
    /// * `Ok(Some(VerificationToken))` - Token found
    /// * `Ok(None)` - No token matches all three fields
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_secret_hash(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        secret_hash: &str,
    ) -> Result<Option<VerificationToken>, DomainError>;

    /// Atomically mark a token consumed if it is not already
    ///
    /// # Returns
    /// * `Ok(true)` - This call flipped the token from unconsumed to consumed
    /// * `Ok(false)` - Token was already consumed or does not exist
    /// * `Err(DomainError)` - Storage error occurred
    async fn consume(&self, id: Uuid, consumed_at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Find all live (unconsumed, unexpired) tokens for a subject and purpose
    async fn find_live(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<Vec<VerificationToken>, DomainError>;

    /// Delete tokens that expired before `before`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of deleted tokens
    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Count live tokens for a subject and purpose
    async fn count_live(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let tokens = self.find_live(subject_id, purpose, now).await?;
        Ok(tokens.len())
    }
}
