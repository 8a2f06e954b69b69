use actix_web::{web, HttpResponse};
use validator::Validate;

use sd_core::repositories::OtpRepository;
use sd_core::services::clock::Clock;
use sd_core::services::otp::Notifier;
use sd_shared::utils::validation::mask_identifier;

use crate::dto::otp::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::domain_error_response;

use super::AppState;

/// Handler for POST /api/verify-otp
///
/// Checks a submitted code against the live record. A mismatch burns one
/// attempt and reports how many remain; a match consumes the record so the
/// same code can never verify twice.
///
/// # Request Body
///
/// ```json
/// {
///     "identifier": "user@example.com",
///     "type": "email",
///     "code": "123456"
/// }
/// ```
///
/// # Responses
/// - 200: `{"success": true}`
/// - 400: malformed request, wrong code (with `attemptsRemaining`), or no
///   live record
/// - 429: attempt quota exhausted
pub async fn verify_otp<R, N, C>(
    state: web::Data<AppState<R, N, C>>,
    request: web::Json<VerifyOtpRequest>,
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

    match state
        .verifier
        .verify(&request.identifier, request.channel, &request.code)
        .await
    {
        Ok(()) => {
            log::info!(
                "Verified {} ({})",
                mask_identifier(&request.identifier),
                request.channel
            );
            HttpResponse::Ok().json(VerifyOtpResponse { success: true })
        }
        Err(error) => {
            log::warn!(
                "Verification failed for {}: {}",
                mask_identifier(&request.identifier),
                error
            );
            domain_error_response(&error)
        }
    }
}
