use actix_web::{web, HttpResponse};

use crate::handlers::domain_error_response;

use authapi_core::repositories::{UserRepository, VerificationTokenRepository};
use authapi_core::services::{Clock, EmailServiceTrait};
use authapi_shared::types::response::MessageResponse;

use super::AppState;

/// Handler for POST /api/user/verify-email/{uid}/{token}/
pub async fn verify_email<U, R, C, E>(
    state: web::Data<AppState<U, R, C, E>>,
    path: web::Path<(String, String)>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: VerificationTokenRepository + 'static,
    C: Clock + 'static,
    E: EmailServiceTrait + 'static,
{
    let (uid, token) = path.into_inner();

    match state.recovery.confirm_email(&uid, &token).await {
        Ok(user) => {
            log::info!("Email verified for user {}", user.id);
            HttpResponse::Ok().json(MessageResponse::new("Email Verified Successfully"))
        }
        Err(error) => domain_error_response(&error),
    }
}
