//! OTP issuer: code generation, resend quota, and dispatch

use std::sync::Arc;

use sd_shared::utils::validation::{
    is_valid_email, is_valid_phone, mask_identifier, normalize_email,
};

use crate::domain::entities::otp_record::{ContactChannel, OtpRecord, MAX_ATTEMPTS};
use crate::errors::{DomainResult, OtpError};
use crate::repositories::OtpRepository;
use crate::services::clock::Clock;

use super::config::OtpServiceConfig;
use super::traits::Notifier;
use super::types::IssueOutcome;

/// Service issuing verification codes for contact points
///
/// One store write per call: the prior record (if any) is superseded by a
/// delete-then-insert the repository performs atomically.
pub struct OtpIssuer<R: OtpRepository, N: Notifier, C: Clock> {
    /// OTP record store
    repository: Arc<R>,
    /// Delivery channel for issued codes
    notifier: Arc<N>,
    /// Injectable time source
    clock: Arc<C>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<R: OtpRepository, N: Notifier, C: Clock> OtpIssuer<R, N, C> {
    /// Create a new issuer
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        clock: Arc<C>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
            config,
        }
    }

    /// Issue a verification code for an identifier/channel pair
    ///
    /// If a valid record already exists, it is superseded and the chain's
    /// resend counter advances; once the chain has used all of its resends,
    /// issuance is refused until the record expires. Delivery failure is
    /// reported in the outcome but does not undo the issuance.
    pub async fn issue(
        &self,
        identifier: &str,
        channel: ContactChannel,
    ) -> DomainResult<IssueOutcome> {
        let identifier = validate_identifier(identifier, channel)?;
        let now = self.clock.now();

        let prior = self
            .repository
            .find_valid(&identifier, channel, now)
            .await?;

        if let Some(prior) = &prior {
            if !prior.can_resend() {
                tracing::warn!(
                    identifier = %mask_identifier(&identifier),
                    channel = %channel,
                    resends = prior.resends,
                    event = "otp_resend_quota_exceeded",
                    "Refusing to issue: resend quota exhausted"
                );
                return Err(OtpError::ResendQuotaExceeded.into());
            }
        }

        let record = match &prior {
            Some(prior) => prior.reissued(now, self.config.code_expiration_minutes),
            None => OtpRecord::with_expiration(
                identifier.clone(),
                channel,
                now,
                self.config.code_expiration_minutes,
            ),
        };

        self.repository
            .replace(record.clone(), prior.map(|p| p.id))
            .await?;

        tracing::info!(
            identifier = %mask_identifier(&identifier),
            channel = %channel,
            resends = record.resends,
            event = "otp_issued",
            "Issued verification code"
        );

        let (subject, body) = compose_message(channel, &record.code, self.config.code_expiration_minutes);
        let message_id = match self.notifier.send(&identifier, &subject, &body).await {
            Ok(message_id) => Some(message_id),
            Err(error) => {
                // Best-effort delivery: the record stays valid so the user
                // can still verify if the message arrives late or via retry
                tracing::warn!(
                    identifier = %mask_identifier(&identifier),
                    channel = %channel,
                    error = %error,
                    event = "otp_dispatch_failed",
                    "Verification code dispatch failed"
                );
                None
            }
        };

        Ok(IssueOutcome {
            attempts_remaining: MAX_ATTEMPTS,
            resend_remaining: record.remaining_resends(),
            expires_at: record.expires_at,
            message_id,
        })
    }
}

/// Validate and normalize an identifier for its channel
///
/// Emails are lower-cased so lookups are case-insensitive; phone numbers are
/// exact 10-digit strings.
pub(super) fn validate_identifier(
    identifier: &str,
    channel: ContactChannel,
) -> Result<String, OtpError> {
    match channel {
        ContactChannel::Email => {
            let normalized = normalize_email(identifier);
            if is_valid_email(&normalized) {
                Ok(normalized)
            } else {
                Err(OtpError::Validation {
                    message: "invalid email identifier".to_string(),
                })
            }
        }
        ContactChannel::Phone => {
            let trimmed = identifier.trim();
            if is_valid_phone(trimmed) {
                Ok(trimmed.to_string())
            } else {
                Err(OtpError::Validation {
                    message: "invalid phone identifier".to_string(),
                })
            }
        }
    }
}

/// Compose the outgoing subject and body for a channel
fn compose_message(channel: ContactChannel, code: &str, expiration_minutes: i64) -> (String, String) {
    match channel {
        ContactChannel::Email => (
            "SignupDesk - Email Verification Code".to_string(),
            format!(
                "Your verification code is: {code}. This code will expire in {expiration_minutes} minutes."
            ),
        ),
        ContactChannel::Phone => (
            "SignupDesk - Phone Verification Code".to_string(),
            format!("Your SignupDesk verification code is {code}."),
        ),
    }
}
