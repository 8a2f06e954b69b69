//! Types for OTP service results

use chrono::{DateTime, Utc};

/// Result of issuing a verification code
///
/// The code itself is deliberately absent: it leaves the service only through
/// the notifier.
#[derive(Debug, Clone)]
pub struct IssueOutcome {
    /// Attempt ceiling for the fresh record (a constant, not a live countdown)
    pub attempts_remaining: i32,
    /// Resends left in this identifier/channel chain
    pub resend_remaining: i32,
    /// When the issued code expires
    pub expires_at: DateTime<Utc>,
    /// Provider message id; `None` when dispatch failed (best effort, the
    /// record stays valid either way)
    pub message_id: Option<String>,
}

impl IssueOutcome {
    /// Whether the notifier accepted the message
    pub fn was_delivered(&self) -> bool {
        self.message_id.is_some()
    }
}
