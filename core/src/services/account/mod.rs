//! Account recovery flows built on the token verification service
//!
//! Covers password reset and email confirmation: issuing a token, mailing a
//! link that carries it, and redeeming the token.

mod config;
mod service;
mod traits;
mod types;
pub mod uid;

#[cfg(test)]
mod tests;

pub use config::AccountRecoveryConfig;
pub use service::AccountRecoveryService;
pub use traits::{EmailMessage, EmailServiceTrait};
pub use types::RecoveryDispatch;
