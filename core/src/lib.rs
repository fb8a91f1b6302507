//! # AuthApi Core
//!
//! Core business logic and domain layer for the AuthApi account service.
//! This crate contains the verification token model, the token verification
//! and account recovery services, repository interfaces with in-memory
//! implementations, and the error types shared by the outer layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{IssuedToken, TokenPurpose, User, VerificationToken};
pub use errors::{AccountError, DomainError, DomainResult, ValidationError, VerificationError};
pub use repositories::{
    InMemoryUserRepository, InMemoryVerificationTokenRepository, UserRepository,
    VerificationTokenRepository,
};
pub use services::{
    AccountRecoveryConfig, AccountRecoveryService, Clock, EmailMessage, EmailServiceTrait,
    ManualClock, RecoveryDispatch, SystemClock, TokenVerificationService,
    VerificationServiceConfig,
};
