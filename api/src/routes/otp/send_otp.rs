use actix_web::{web, HttpResponse};
use validator::Validate;

use sd_core::repositories::OtpRepository;
use sd_core::services::clock::Clock;
use sd_core::services::otp::Notifier;
use sd_shared::utils::validation::mask_identifier;

use crate::dto::otp::{SendOtpRequest, SendOtpResponse};
use crate::handlers::error::domain_error_response;

use super::AppState;

/// Handler for POST /api/send-otp
///
/// Issues a verification code for the identifier and dispatches it through
/// the notification channel. Rate limiting runs before this handler; the
/// per-identifier resend quota is enforced inside the issuer.
///
/// # Request Body
///
/// ```json
/// {
///     "identifier": "user@example.com",
///     "type": "email"
/// }
/// ```
///
/// # Responses
/// - 200: `{"success": true, "attemptsRemaining": 10, "resendRemaining": 5}`
/// - 400: malformed request
/// - 429: resend quota or rate limit exhausted
pub async fn send_otp<R, N, C>(
    state: web::Data<AppState<R, N, C>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    N: Notifier + 'static,
    C: Clock + 'static,
{
    if request.0.validate().is_err() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid request"
        }));
    }

    log::info!(
        "Processing send-otp request for {} ({})",
        mask_identifier(&request.identifier),
        request.channel
    );

    match state.issuer.issue(&request.identifier, request.channel).await {
        Ok(outcome) => {
            if !outcome.was_delivered() {
                log::warn!(
                    "Verification code issued for {} but dispatch failed",
                    mask_identifier(&request.identifier)
                );
            }

            HttpResponse::Ok().json(SendOtpResponse {
                success: true,
                attempts_remaining: outcome.attempts_remaining,
                resend_remaining: outcome.resend_remaining,
            })
        }
        Err(error) => {
            log::warn!(
                "Failed to issue verification code for {}: {}",
                mask_identifier(&request.identifier),
                error
            );
            domain_error_response(&error)
        }
    }
}
