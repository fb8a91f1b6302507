pub mod user;
pub mod verification_token;

pub use user::{InMemoryUserRepository, UserRepository};
pub use verification_token::{InMemoryVerificationTokenRepository, VerificationTokenRepository};
