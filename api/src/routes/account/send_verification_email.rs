use actix_web::{web, HttpResponse};

use crate::dto::SendVerificationEmailRequest;
use crate::handlers::domain_error_response;

use authapi_core::repositories::{UserRepository, VerificationTokenRepository};
use authapi_core::services::{Clock, EmailServiceTrait};
use authapi_shared::types::response::MessageResponse;

use super::AppState;

/// Handler for POST /api/user/send-verification-email/
pub async fn send_verification_email<U, R, C, E>(
    state: web::Data<AppState<U, R, C, E>>,
    request: web::Json<SendVerificationEmailRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: VerificationTokenRepository + 'static,
    C: Clock + 'static,
    E: EmailServiceTrait + 'static,
{
    match state.recovery.send_verification_email(request.user_id).await {
        Ok(dispatch) => {
            let link = state.expose_links.then(|| dispatch.link.clone());
            HttpResponse::Ok().json(
                MessageResponse::new("Verification link send. Please check your Email").with_link(link),
            )
        }
        Err(error) => domain_error_response(&error),
    }
}
