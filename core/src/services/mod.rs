//! Business services containing domain logic and use cases.

pub mod account;
pub mod clock;
pub mod verification;

// Re-export commonly used types
pub use account::{
    AccountRecoveryConfig, AccountRecoveryService, EmailMessage, EmailServiceTrait,
    RecoveryDispatch,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use verification::{TokenVerificationService, VerificationServiceConfig};
