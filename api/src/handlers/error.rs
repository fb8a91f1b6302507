use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use validator::ValidationErrors;

use crate::dto::error::{field_errors, ErrorResponse, ErrorResponseExt};
use authapi_core::errors::{AccountError, DomainError, VerificationError};

/// Message shared by every rejected token so callers cannot tell the kinds apart
pub const INVALID_TOKEN_MESSAGE: &str = "Token is not Valid or Expired";

/// Convert a domain error into the matching HTTP response
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Verification(verification) => match verification {
            VerificationError::InvalidArgument { message } => {
                log::warn!("Rejected token request: {}", message);
                ErrorResponse::new(error.code(), message.as_str()).to_response(StatusCode::BAD_REQUEST)
            }
            VerificationError::NotFound
            | VerificationError::Expired
            | VerificationError::AlreadyConsumed => {
                log::info!("Token rejected: {}", error.code());
                ErrorResponse::new(error.code(), INVALID_TOKEN_MESSAGE)
                    .to_response(StatusCode::BAD_REQUEST)
            }
        },
        DomainError::Account(account) => {
            let status = match account {
                AccountError::UserNotFound => StatusCode::NOT_FOUND,
                AccountError::PasswordMismatch => StatusCode::BAD_REQUEST,
                AccountError::EmailAlreadyVerified => StatusCode::CONFLICT,
                AccountError::PasswordHashingFailed => {
                    log::error!("Password hashing failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            ErrorResponse::new(error.code(), account.to_string()).to_response(status)
        }
        DomainError::ValidationErr(validation) => {
            ErrorResponse::new(error.code(), validation.to_string()).to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::Validation { message } => {
            ErrorResponse::new(error.code(), message.as_str()).to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::NotFound { resource } => {
            ErrorResponse::new(error.code(), format!("{} not found", resource))
                .to_response(StatusCode::NOT_FOUND)
        }
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            ErrorResponse::new(error.code(), "An internal error occurred")
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// 400 response listing the failing request fields
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let details = field_errors(errors);
    log::warn!("Request validation failed: {:?}", details.keys().collect::<Vec<_>>());

    ErrorResponse::new("VALIDATION_ERROR", "Invalid request data")
        .with_details(details)
        .to_response(StatusCode::BAD_REQUEST)
}

/// Render malformed JSON bodies in the standard error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = ErrorResponse::new("INVALID_REQUEST_BODY", err.to_string())
        .to_response(StatusCode::BAD_REQUEST);
    actix_web::error::InternalError::from_response(err, response).into()
}
