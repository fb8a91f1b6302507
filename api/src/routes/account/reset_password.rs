use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::ResetPasswordRequest;
use crate::handlers::{domain_error_response, validation_error_response};

use authapi_core::repositories::{UserRepository, VerificationTokenRepository};
use authapi_core::services::{Clock, EmailServiceTrait};
use authapi_shared::types::response::MessageResponse;

use super::AppState;

/// Handler for POST /api/user/reset-password/{uid}/{token}/
///
/// # Request Body
///
/// ```json
/// { "password": "new-secret", "password2": "new-secret" }
/// ```
///
/// # Errors
///
/// * 400 - Invalid fields, mismatched passwords, or a token that is unknown,
///   expired or already used
/// * 500 - Storage or hashing failure
pub async fn reset_password<U, R, C, E>(
    state: web::Data<AppState<U, R, C, E>>,
    path: web::Path<(String, String)>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: VerificationTokenRepository + 'static,
    C: Clock + 'static,
    E: EmailServiceTrait + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let (uid, token) = path.into_inner();

    match state
        .recovery
        .reset_password(&uid, &token, &request.password, &request.password2)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Password Reset Successfully")),
        Err(error) => domain_error_response(&error),
    }
}
