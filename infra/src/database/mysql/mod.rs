//! MySQL repository implementations

mod user_repository_impl;
mod verification_token_repository_impl;

pub use user_repository_impl::MySqlUserRepository;
pub use verification_token_repository_impl::MySqlVerificationTokenRepository;
