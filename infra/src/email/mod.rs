//! Email Service Module
//!
//! Outgoing mail transports for the recovery flows. Only a mock transport
//! ships today; it logs messages and keeps an outbox for inspection.

pub mod mock_email;

pub use mock_email::MockEmailService;
