//! Unit tests for domain error types

use crate::errors::{AccountError, DomainError, ErrorResponse, ValidationError, VerificationError};

#[test]
fn test_verification_error_codes_are_distinct() {
    let codes = [
        VerificationError::invalid_argument("ttl").code(),
        VerificationError::NotFound.code(),
        VerificationError::Expired.code(),
        VerificationError::AlreadyConsumed.code(),
    ];
    let unique: std::collections::HashSet<_> = codes.iter().collect();
    assert_eq!(unique.len(), codes.len());
}

#[test]
fn test_verification_error_conversion() {
    let response: ErrorResponse = VerificationError::Expired.into();
    assert_eq!(response.error, "TOKEN_EXPIRED");
    assert!(response.message.contains("expired"));
}

#[test]
fn test_account_error_messages() {
    assert_eq!(
        AccountError::PasswordMismatch.to_string(),
        "Password and Confirm Password doesn't match"
    );
    assert_eq!(AccountError::UserNotFound.to_string(), "You are not a Registered User");
}

#[test]
fn test_domain_error_bridges_codes() {
    let err: DomainError = VerificationError::AlreadyConsumed.into();
    assert_eq!(err.code(), "TOKEN_ALREADY_CONSUMED");
    assert_eq!(err.as_verification(), Some(&VerificationError::AlreadyConsumed));

    let err: DomainError = ValidationError::InvalidEmail.into();
    assert_eq!(err.code(), "INVALID_EMAIL");
    assert!(err.as_verification().is_none());

    let err = DomainError::Internal {
        message: "connection reset".to_string(),
    };
    assert_eq!(err.code(), "INTERNAL_ERROR");
    assert!(err.to_string().contains("connection reset"));
}

#[test]
fn test_validation_error_with_fields() {
    let error = ValidationError::TooLong {
        field: "password".to_string(),
        max: 255,
        actual: 300,
    };
    let message = error.to_string();
    assert!(message.contains("password"));
    assert!(message.contains("255"));
}
