//! Configuration for the OTP services

use crate::domain::entities::otp_record::DEFAULT_EXPIRATION_MINUTES;

/// Configuration for the OTP issuer and verifier
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of minutes before an issued code expires
    pub code_expiration_minutes: i64,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
        }
    }
}
