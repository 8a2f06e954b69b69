//! OTP verifier: attempt tracking and single-use consumption

use std::sync::Arc;

use sd_shared::utils::validation::{is_valid_otp_code, mask_identifier};

use crate::domain::entities::otp_record::{ContactChannel, MAX_ATTEMPTS};
use crate::errors::{DomainResult, OtpError};
use crate::repositories::OtpRepository;
use crate::services::clock::Clock;

use super::issuer::validate_identifier;

/// Service checking submitted codes against the store
pub struct OtpVerifier<R: OtpRepository, C: Clock> {
    /// OTP record store
    repository: Arc<R>,
    /// Injectable time source
    clock: Arc<C>,
}

impl<R: OtpRepository, C: Clock> OtpVerifier<R, C> {
    /// Create a new verifier
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Verify a submitted code for an identifier/channel pair
    ///
    /// A mismatch burns one attempt and keeps the record; a match consumes
    /// the record so the same code can never verify twice. Exhausted records
    /// are rejected without any further mutation. Marking the contact point
    /// verified is the signup flow's concern, not this service's.
    pub async fn verify(
        &self,
        identifier: &str,
        channel: ContactChannel,
        code: &str,
    ) -> DomainResult<()> {
        let identifier = validate_identifier(identifier, channel)?;
        // Ill-shaped codes are a request error, not a burned attempt
        if !is_valid_otp_code(code) {
            tracing::warn!(
                identifier = %mask_identifier(&identifier),
                channel = %channel,
                code_length = code.len(),
                event = "otp_code_malformed",
                "Submitted code does not have the expected shape"
            );
            return Err(OtpError::Validation {
                message: "code must be 6 digits".to_string(),
            }
            .into());
        }
        let now = self.clock.now();

        let record = self
            .repository
            .find_valid(&identifier, channel, now)
            .await?
            .ok_or(OtpError::NotFoundOrExpired)?;

        if record.is_exhausted() {
            tracing::warn!(
                identifier = %mask_identifier(&identifier),
                channel = %channel,
                event = "otp_attempts_exhausted",
                "Rejecting verification: attempt quota used up"
            );
            return Err(OtpError::AttemptsExhausted.into());
        }

        if !record.matches(code) {
            let new_attempts = self.repository.increment_attempts(record.id).await?;
            tracing::warn!(
                identifier = %mask_identifier(&identifier),
                channel = %channel,
                attempts = new_attempts,
                event = "otp_verification_failed",
                "Submitted code did not match"
            );
            return Err(OtpError::InvalidCode {
                attempts_remaining: (MAX_ATTEMPTS - new_attempts).max(0),
            }
            .into());
        }

        // Single use: consume on success
        self.repository.delete(record.id).await?;

        tracing::info!(
            identifier = %mask_identifier(&identifier),
            channel = %channel,
            event = "otp_verified",
            "Verification code accepted"
        );

        Ok(())
    }
}
