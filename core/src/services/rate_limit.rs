//! Rate limiting trait for the OTP send endpoint
//!
//! This is a coarse anti-abuse layer keyed on the client address. It is
//! independent of the per-identifier resend quota, which lives on the OTP
//! records and persists across address changes.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Outcome of a rate-limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request is within limits; the request has been counted
    Allowed { remaining: u32 },
    /// Cap exceeded; the request must be rejected before any work happens
    Limited { retry_after_seconds: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// Rate limiting service trait
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Check and record one request from the given client address
    async fn check(&self, client_addr: &str) -> Result<RateLimitDecision, DomainError>;
}
