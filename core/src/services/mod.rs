//! Business services containing domain logic and use cases.

pub mod clock;
pub mod otp;
pub mod rate_limit;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use otp::{
    IssueOutcome, Notifier, OtpIssuer, OtpServiceConfig, OtpVerifier,
};
pub use rate_limit::{RateLimitDecision, RateLimiterTrait};
