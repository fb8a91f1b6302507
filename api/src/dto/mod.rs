//! Request and response data transfer objects

pub mod account;
pub mod error;

pub use account::{ResetPasswordRequest, SendResetPasswordEmailRequest, SendVerificationEmailRequest};
pub use error::{ErrorResponse, ErrorResponseExt};
