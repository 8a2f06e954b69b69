//! OTP flow error taxonomy
//!
//! Every member surfaces to the caller as a structured HTTP error response;
//! none is fatal to the process. The display strings are the user-facing
//! messages the API returns verbatim.

use thiserror::Error;

/// Errors produced by the OTP issue/verify protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// Malformed request: missing or ill-shaped identifier/type/code
    #[error("Invalid request")]
    Validation { message: String },

    /// Per-address request frequency cap exceeded
    #[error("Too many OTP requests, please try again later.")]
    RateLimited { retry_after_seconds: u64 },

    /// The identifier/channel chain has used all of its resends
    #[error("Maximum resend limit reached")]
    ResendQuotaExceeded,

    /// The record has absorbed the maximum number of failed attempts
    #[error("Maximum attempts exceeded")]
    AttemptsExhausted,

    /// Submitted code does not match the live record
    #[error("Invalid OTP")]
    InvalidCode { attempts_remaining: i32 },

    /// No live record exists for the identifier/channel pair
    #[error("Invalid or expired OTP")]
    NotFoundOrExpired,

    /// The notification channel reported a dispatch failure
    #[error("Failed to dispatch verification code")]
    NotifierFailure { message: String },
}

impl OtpError {
    /// Error code for programmatic handling in API responses
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::Validation { .. } => "VALIDATION_ERROR",
            OtpError::RateLimited { .. } => "RATE_LIMITED",
            OtpError::ResendQuotaExceeded => "RESEND_QUOTA_EXCEEDED",
            OtpError::AttemptsExhausted => "ATTEMPTS_EXHAUSTED",
            OtpError::InvalidCode { .. } => "INVALID_CODE",
            OtpError::NotFoundOrExpired => "NOT_FOUND_OR_EXPIRED",
            OtpError::NotifierFailure { .. } => "NOTIFIER_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            OtpError::ResendQuotaExceeded.to_string(),
            "Maximum resend limit reached"
        );
        assert_eq!(
            OtpError::AttemptsExhausted.to_string(),
            "Maximum attempts exceeded"
        );
        assert_eq!(
            OtpError::InvalidCode { attempts_remaining: 9 }.to_string(),
            "Invalid OTP"
        );
        assert_eq!(
            OtpError::NotFoundOrExpired.to_string(),
            "Invalid or expired OTP"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(OtpError::RateLimited { retry_after_seconds: 60 }.code(), "RATE_LIMITED");
        assert_eq!(OtpError::NotFoundOrExpired.code(), "NOT_FOUND_OR_EXPIRED");
    }
}
