//! Application factory
//!
//! Builds the Actix-web application around a prepared `AppState`.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::handlers::json_error_handler;
use crate::routes::account::{
    reset_password::reset_password, send_reset_password_email::send_reset_password_email,
    send_verification_email::send_verification_email, verify_email::verify_email, AppState,
};

use authapi_core::repositories::{UserRepository, VerificationTokenRepository};
use authapi_core::services::{Clock, EmailServiceTrait};
use authapi_shared::types::response::{ErrorResponse, HealthResponse, HealthStatus};

/// Create and configure the application with all dependencies
pub fn create_app<U, R, C, E>(
    app_state: web::Data<AppState<U, R, C, E>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    R: VerificationTokenRepository + 'static,
    C: Clock + 'static,
    E: EmailServiceTrait + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/user")
                .route(
                    "/send-reset-password-email/",
                    web::post().to(send_reset_password_email::<U, R, C, E>),
                )
                .route(
                    "/reset-password/{uid}/{token}/",
                    web::post().to(reset_password::<U, R, C, E>),
                )
                .route(
                    "/send-verification-email/",
                    web::post().to(send_verification_email::<U, R, C, E>),
                )
                .route(
                    "/verify-email/{uid}/{token}/",
                    web::post().to(verify_email::<U, R, C, E>),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: HealthStatus::Healthy,
        service: "authapi".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "NOT_FOUND",
        "The requested resource was not found",
    ))
}
