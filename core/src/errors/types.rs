//! Domain-specific error types for token verification and account recovery
//!
//! Each error kind maps to a stable error code so that adapters can translate
//! failures into user-facing responses without string matching.

use authapi_shared::types::response::ErrorResponse;
use thiserror::Error;

// Re-export shared ErrorResponse under the domain name
pub use authapi_shared::types::response::ErrorResponse as DomainErrorResponse;

/// Verification token failures
///
/// Every failed `validate` call resolves to exactly one of these kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Verification token not found")]
    NotFound,

    #[error("Verification token expired")]
    Expired,

    #[error("Verification token already consumed")]
    AlreadyConsumed,
}

impl VerificationError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        VerificationError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            VerificationError::NotFound => "TOKEN_NOT_FOUND",
            VerificationError::Expired => "TOKEN_EXPIRED",
            VerificationError::AlreadyConsumed => "TOKEN_ALREADY_CONSUMED",
        }
    }
}

/// Account recovery failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("You are not a Registered User")]
    UserNotFound,

    #[error("Password and Confirm Password doesn't match")]
    PasswordMismatch,

    #[error("Email already verified")]
    EmailAlreadyVerified,

    #[error("Password hashing failed")]
    PasswordHashingFailed,
}

impl AccountError {
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::UserNotFound => "USER_NOT_FOUND",
            AccountError::PasswordMismatch => "PASSWORD_MISMATCH",
            AccountError::EmailAlreadyVerified => "EMAIL_ALREADY_VERIFIED",
            AccountError::PasswordHashingFailed => "PASSWORD_HASHING_FAILED",
        }
    }
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid length for field: {field} (max: {max}, actual: {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Invalid email format")]
    InvalidEmail,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RequiredField { .. } => "REQUIRED_FIELD",
            ValidationError::TooLong { .. } => "INVALID_LENGTH",
            ValidationError::InvalidEmail => "INVALID_EMAIL",
        }
    }
}

/// Convert VerificationError to ErrorResponse
impl From<VerificationError> for ErrorResponse {
    fn from(err: VerificationError) -> Self {
        ErrorResponse::new(err.code(), err.to_string())
    }
}

/// Convert AccountError to ErrorResponse
impl From<AccountError> for ErrorResponse {
    fn from(err: AccountError) -> Self {
        ErrorResponse::new(err.code(), err.to_string())
    }
}

/// Convert ValidationError to ErrorResponse
impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        ErrorResponse::new(err.code(), err.to_string())
    }
}
