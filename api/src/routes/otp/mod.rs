//! OTP endpoint handlers

pub mod send_otp;
pub mod verify_otp;

pub use send_otp::send_otp;
pub use verify_otp::verify_otp;

use std::sync::Arc;

use sd_core::repositories::OtpRepository;
use sd_core::services::clock::Clock;
use sd_core::services::otp::{Notifier, OtpIssuer, OtpVerifier};

/// Application state holding the shared OTP services
pub struct AppState<R, N, C>
where
    R: OtpRepository,
    N: Notifier,
    C: Clock,
{
    pub issuer: Arc<OtpIssuer<R, N, C>>,
    pub verifier: Arc<OtpVerifier<R, C>>,
}
