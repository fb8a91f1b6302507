//! Token verification service for password reset and email verification
//!
//! This module provides the single-use token workflow:
//! - Issuing purpose-scoped tokens bound to a subject
//! - Superseding older live tokens on re-issue
//! - Validating and consuming tokens exactly once

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::{TokenVerificationService, MAX_SUBJECT_ID_LENGTH};
