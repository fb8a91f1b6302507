//! Domain entities representing core business objects.

pub mod user;
pub mod verification_token;

// Re-export commonly used types
pub use user::User;
pub use verification_token::{
    IssuedToken, TokenPurpose, VerificationToken,
    EMAIL_VERIFICATION_TTL_HOURS, PASSWORD_RESET_TTL_MINUTES, SECRET_BYTES,
};
