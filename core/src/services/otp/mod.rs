//! OTP issue/verify services
//!
//! This module implements the verification protocol for email and phone
//! contact points:
//! - code generation, resend quota, and record supersede (issuer)
//! - attempt tracking and single-use consumption (verifier)
//! - the `Notifier` collaborator interface for code delivery

mod config;
mod issuer;
mod traits;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use issuer::OtpIssuer;
pub use traits::Notifier;
pub use types::IssueOutcome;
pub use verifier::OtpVerifier;
