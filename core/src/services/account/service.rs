//! Account recovery service implementation

use std::sync::Arc;
use tracing;
use uuid::Uuid;

use authapi_shared::utils::validation::{is_valid_email, mask_email, normalize_email, MAX_EMAIL_LENGTH};

use crate::domain::entities::user::User;
use crate::domain::entities::verification_token::{IssuedToken, TokenPurpose};
use crate::errors::{AccountError, DomainError, DomainResult, ValidationError, VerificationError};
use crate::repositories::user::UserRepository;
use crate::repositories::verification_token::VerificationTokenRepository;
use crate::services::clock::Clock;
use crate::services::verification::TokenVerificationService;

use super::config::AccountRecoveryConfig;
use super::traits::{EmailMessage, EmailServiceTrait};
use super::types::RecoveryDispatch;
use super::uid::{decode_uid, encode_uid};

/// Maximum accepted password length
pub const MAX_PASSWORD_LENGTH: usize = 255;

const RESET_SUBJECT: &str = "Reset Your Password";
const VERIFY_SUBJECT: &str = "Verify Your Email";

/// Password reset and email confirmation flows
pub struct AccountRecoveryService<U, R, C, E>
where
    U: UserRepository,
    R: VerificationTokenRepository,
    C: Clock,
    E: EmailServiceTrait,
{
    /// Identity store
    users: Arc<U>,
    /// Token issue and validation
    tokens: Arc<TokenVerificationService<R, C>>,
    /// Outgoing mail transport
    email_service: Arc<E>,
    /// Service configuration
    config: AccountRecoveryConfig,
}

impl<U, R, C, E> AccountRecoveryService<U, R, C, E>
where
    U: UserRepository,
    R: VerificationTokenRepository,
    C: Clock,
    E: EmailServiceTrait,
{
    /// Create a new account recovery service
    ///
    /// # Arguments
    ///
    /// * `users` - User repository implementation
    /// * `tokens` - Token verification service
    /// * `email_service` - Email transport implementation
    /// * `config` - Service configuration
    pub fn new(
        users: Arc<U>,
        tokens: Arc<TokenVerificationService<R, C>>,
        email_service: Arc<E>,
        config: AccountRecoveryConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            email_service,
            config,
        }
    }

    /// Email a password reset link to a registered address
    ///
    /// This method:
    /// 1. Normalizes and validates the email
    /// 2. Resolves the user, failing with `UserNotFound` if absent
    /// 3. Issues a PasswordReset token, superseding earlier ones
    /// 4. Sends the reset link; a delivery failure is logged, not returned
    ///
    /// # Returns
    ///
    /// * `Ok(RecoveryDispatch)` - The uid, link and delivery status
    /// * `Err(DomainError)` - Validation failure, unknown user or storage error
    pub async fn send_password_reset_email(&self, email: &str) -> DomainResult<RecoveryDispatch> {
        let email = normalize_email(email);
        Self::validate_email(&email)?;

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::info!(
                    email = %mask_email(&email),
                    event = "password_reset_unknown_email",
                    "Password reset requested for unregistered email"
                );
                return Err(AccountError::UserNotFound.into());
            }
        };

        let issued = self
            .tokens
            .issue_with_default_ttl(&user.subject_id(), TokenPurpose::PasswordReset)
            .await?;

        let uid = encode_uid(user.id);
        let link = format!(
            "{}/api/user/reset/{}/{}",
            self.config.frontend_base_url, uid, issued.secret
        );
        let body = format!("Click Following Link to Reset Your Password {}", link);

        let delivered = self.deliver(&user, RESET_SUBJECT, body).await;

        Ok(RecoveryDispatch {
            uid,
            link,
            delivered,
            expires_at: issued.token.expires_at,
        })
    }

    /// Set a new password using a reset link's uid and token
    ///
    /// Password checks and hashing run before the token is consumed, so a
    /// mismatch or a hashing failure leaves the token usable.
    pub async fn reset_password(
        &self,
        uid: &str,
        token: &str,
        password: &str,
        password2: &str,
    ) -> DomainResult<()> {
        if password != password2 {
            return Err(AccountError::PasswordMismatch.into());
        }
        Self::validate_password(password)?;

        let user = self.resolve_uid(uid).await?;

        // Hash first so a hashing failure leaves the link usable
        let password_hash = self.hash_password(password).await?;

        self.tokens
            .validate(&user.subject_id(), TokenPurpose::PasswordReset, token)
            .await?;

        if !self.users.update_password_hash(user.id, &password_hash).await? {
            return Err(DomainError::NotFound {
                resource: format!("user {}", user.id),
            });
        }

        tracing::info!(
            user_id = %user.id,
            event = "password_reset_completed",
            "Password reset completed"
        );

        Ok(())
    }

    /// Email a verification link to a user
    pub async fn send_verification_email(&self, user_id: Uuid) -> DomainResult<RecoveryDispatch> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if user.is_email_verified {
            return Err(AccountError::EmailAlreadyVerified.into());
        }

        let issued: IssuedToken = self
            .tokens
            .issue_with_default_ttl(&user.subject_id(), TokenPurpose::EmailVerification)
            .await?;

        let uid = encode_uid(user.id);
        let link = format!(
            "{}/api/user/verify-email/{}/{}",
            self.config.frontend_base_url, uid, issued.secret
        );
        let body = format!("Click Following Link to Verify Your Email {}", link);

        let delivered = self.deliver(&user, VERIFY_SUBJECT, body).await;

        Ok(RecoveryDispatch {
            uid,
            link,
            delivered,
            expires_at: issued.token.expires_at,
        })
    }

    /// Confirm a user's email address with a verification link's uid and token
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The user, now verified
    pub async fn confirm_email(&self, uid: &str, token: &str) -> DomainResult<User> {
        let mut user = self.resolve_uid(uid).await?;

        self.tokens
            .validate(&user.subject_id(), TokenPurpose::EmailVerification, token)
            .await?;

        if !self.users.mark_email_verified(user.id).await? {
            return Err(DomainError::NotFound {
                resource: format!("user {}", user.id),
            });
        }
        user.verify_email();

        tracing::info!(
            user_id = %user.id,
            event = "email_verified",
            "Email address verified"
        );

        Ok(user)
    }

    /// Map a uid to a user; an undecodable uid or unknown user reads as an unknown token
    async fn resolve_uid(&self, uid: &str) -> DomainResult<User> {
        let user_id = decode_uid(uid).ok_or(VerificationError::NotFound)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(VerificationError::NotFound)?;
        Ok(user)
    }

    async fn deliver(&self, user: &User, subject: &str, body: String) -> bool {
        let message = EmailMessage {
            to: user.email.clone(),
            from: self.config.email_from.clone(),
            subject: subject.to_string(),
            body,
        };

        match self.email_service.send_email(&message).await {
            Ok(message_id) => {
                tracing::info!(
                    email = %mask_email(&user.email),
                    message_id = %message_id,
                    subject = subject,
                    event = "recovery_email_sent",
                    "Recovery email sent"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    email = %mask_email(&user.email),
                    error = %e,
                    subject = subject,
                    event = "recovery_email_failed",
                    "Failed to send recovery email"
                );
                false
            }
        }
    }

    async fn hash_password(&self, password: &str) -> DomainResult<String> {
        let password = password.to_string();
        let cost = self.config.bcrypt_cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
            .map_err(|e| {
                tracing::error!(error = %e, event = "password_hash_failed", "bcrypt hashing failed");
                AccountError::PasswordHashingFailed.into()
            })
    }

    fn validate_email(email: &str) -> Result<(), ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "email".to_string(),
            });
        }
        if email.len() > MAX_EMAIL_LENGTH {
            return Err(ValidationError::TooLong {
                field: "email".to_string(),
                max: MAX_EMAIL_LENGTH,
                actual: email.len(),
            });
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_password(password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            });
        }
        let length = password.chars().count();
        if length > MAX_PASSWORD_LENGTH {
            return Err(ValidationError::TooLong {
                field: "password".to_string(),
                max: MAX_PASSWORD_LENGTH,
                actual: length,
            });
        }
        Ok(())
    }
}
