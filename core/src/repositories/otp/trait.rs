//! OTP repository trait defining the interface for OTP record persistence.
//!
//! The store is the ground truth for attempts, resends, and expiry. Expiry is
//! lazy: reads filter on `expires_at`, nothing depends on a background
//! reaper. Implementations must keep `replace` and `increment_attempts`
//! atomic so concurrent sends and concurrent wrong guesses cannot violate
//! the single-valid-record invariant or lose counter updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::otp_record::{ContactChannel, OtpRecord};
use crate::errors::DomainError;

/// Repository trait for OTP record persistence operations
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Find the current valid (non-expired) record for an identifier/channel
    /// pair
    ///
    /// If more than one record could match, the oldest by `created_at` wins.
    async fn find_valid(
        &self,
        identifier: &str,
        channel: ContactChannel,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Replace the prior record (if any) with a new one, atomically
    ///
    /// The delete of `prior` and the insert of `record` happen as one unit so
    /// two racing sends for the same pair cannot both leave a record behind.
    async fn replace(&self, record: OtpRecord, prior: Option<Uuid>) -> Result<(), DomainError>;

    /// Atomically increment the failed-attempt counter, returning the new
    /// count
    async fn increment_attempts(&self, id: Uuid) -> Result<i32, DomainError>;

    /// Delete a record (consumption on success, or discard)
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Remove expired rows, returning how many were purged
    ///
    /// Optional housekeeping; correctness never depends on it being called.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
