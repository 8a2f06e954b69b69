//! One-time-passcode record entity for contact-point verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of failed verification attempts per record
pub const MAX_ATTEMPTS: i32 = 10;

/// Maximum number of reissues for one identifier/channel chain
pub const MAX_RESENDS: i32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// Delivery channel an OTP is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    Email,
    Phone,
}

impl ContactChannel {
    /// Stable string form used in the database and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactChannel::Email => "email",
            ContactChannel::Phone => "phone",
        }
    }

    /// Parse the wire/database string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(ContactChannel::Email),
            "phone" => Some(ContactChannel::Phone),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-time-passcode record bound to an (identifier, channel) pair
///
/// At most one valid (non-expired) record exists per pair; a resend
/// supersedes the prior record rather than coexisting with it. The entity is
/// clock-free: every time-dependent check takes `now` as a parameter so the
/// services above it can inject a deterministic clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Email address or 10-digit phone number this code is bound to
    pub identifier: String,

    /// Delivery channel
    pub channel: ContactChannel,

    /// The 6-digit verification code
    pub code: String,

    /// Number of failed verification attempts made against this record
    pub attempts: i32,

    /// Number of reissues since the first issuance in the current chain
    pub resends: i32,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the record expires
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a new record with a fresh random 6-digit code
    pub fn new(identifier: String, channel: ContactChannel, now: DateTime<Utc>) -> Self {
        Self::with_expiration(identifier, channel, now, DEFAULT_EXPIRATION_MINUTES)
    }

    /// Creates a new record with a custom expiration window
    pub fn with_expiration(
        identifier: String,
        channel: ContactChannel,
        now: DateTime<Utc>,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier,
            channel,
            code: Self::generate_code(),
            attempts: 0,
            resends: 0,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
        }
    }

    /// Builds the successor record for a resend
    ///
    /// The successor carries a fresh code and reset attempts, and counts one
    /// more resend in the chain. The caller is responsible for replacing the
    /// prior record in the store.
    pub fn reissued(&self, now: DateTime<Utc>, expiration_minutes: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: self.identifier.clone(),
            channel: self.channel,
            code: Self::generate_code(),
            attempts: 0,
            resends: self.resends + 1,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
        }
    }

    /// Generates a random 6-digit code, uniform in [100000, 999999]
    ///
    /// Uses the OS CSPRNG so codes are not guessable from observed sequences.
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(100_000..1_000_000);
        code.to_string()
    }

    /// Checks whether the record has expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks whether the attempt quota is used up
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// Checks whether the record can still be verified against
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && !self.is_exhausted()
    }

    /// Checks whether another resend is allowed for this chain
    pub fn can_resend(&self) -> bool {
        self.resends < MAX_RESENDS
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, submitted: &str) -> bool {
        self.code.len() == submitted.len()
            && constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Remaining failed attempts before the record is exhausted
    pub fn remaining_attempts(&self) -> i32 {
        (MAX_ATTEMPTS - self.attempts).max(0)
    }

    /// Remaining resends in this chain
    pub fn remaining_resends(&self) -> i32 {
        (MAX_RESENDS - self.resends).max(0)
    }

    /// Time remaining until expiration, zero if already expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
