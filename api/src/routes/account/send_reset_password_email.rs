use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::SendResetPasswordEmailRequest;
use crate::handlers::{domain_error_response, validation_error_response};

use authapi_core::errors::{AccountError, DomainError};
use authapi_core::repositories::{UserRepository, VerificationTokenRepository};
use authapi_core::services::{Clock, EmailServiceTrait};
use authapi_shared::types::response::MessageResponse;
use authapi_shared::utils::validation::{mask_email, normalize_email};

use super::AppState;

pub const RESET_LINK_SENT: &str = "Password Reset link send. Please check your Email";

/// Handler for POST /api/user/send-reset-password-email/
///
/// Answers the same way whether or not the address is registered.
///
/// # Request Body
///
/// ```json
/// { "email": "jane@example.com" }
/// ```
pub async fn send_reset_password_email<U, R, C, E>(
    state: web::Data<AppState<U, R, C, E>>,
    request: web::Json<SendResetPasswordEmailRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: VerificationTokenRepository + 'static,
    C: Clock + 'static,
    E: EmailServiceTrait + 'static,
{
    let mut request = request.into_inner();
    request.email = normalize_email(&request.email);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    log::info!("Password reset requested for {}", mask_email(&request.email));

    match state.recovery.send_password_reset_email(&request.email).await {
        Ok(dispatch) => {
            let link = state.expose_links.then(|| dispatch.link.clone());
            HttpResponse::Ok().json(MessageResponse::new(RESET_LINK_SENT).with_link(link))
        }
        Err(DomainError::Account(AccountError::UserNotFound)) => {
            HttpResponse::Ok().json(MessageResponse::new(RESET_LINK_SENT))
        }
        Err(error) => domain_error_response(&error),
    }
}
