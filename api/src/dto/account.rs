use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendResetPasswordEmailRequest {
    /// Address of the account to recover
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, max = 255, message = "Password must be 1 to 255 characters"))]
    pub password: String,

    /// Confirmation, must equal `password`
    #[validate(length(min = 1, max = 255, message = "Password must be 1 to 255 characters"))]
    pub password2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendVerificationEmailRequest {
    pub user_id: Uuid,
}
