//! User repository trait defining the identity store contract.
//!
//! Registration and login live outside this crate; recovery only needs to
//! resolve users and update two fields.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User lookups and recovery-related updates
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by normalized email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered with this email
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Replace the stored password hash
    ///
    /// # Returns
    /// * `Ok(true)` - Password updated
    /// * `Ok(false)` - No such user
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DomainError>;

    /// Mark the user's email address as verified
    ///
    /// # Returns
    /// * `Ok(true)` - Flag set
    /// * `Ok(false)` - No such user
    async fn mark_email_verified(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Check whether an email address is registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
