//! Mapping from domain errors to HTTP responses
//!
//! Every taxonomy member becomes a structured JSON error with a
//! human-readable message; quota and frequency violations map to 429, bad
//! input and stale codes to 400. Internal failures never leak detail.

use actix_web::HttpResponse;
use sd_core::errors::{DomainError, OtpError};

/// Convert a domain error into the HTTP response the client sees
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Otp(otp) => otp_error_response(otp),
        DomainError::Validation { .. } => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid request"
            }))
        }
        // A record vanishing mid-flow (e.g. consumed by a racing request)
        // reads the same as expiry from the client's perspective
        DomainError::NotFound { .. } => HttpResponse::BadRequest().json(serde_json::json!({
            "message": OtpError::NotFoundOrExpired.to_string()
        })),
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal server error"
            }))
        }
    }
}

fn otp_error_response(error: &OtpError) -> HttpResponse {
    let message = error.to_string();
    match error {
        OtpError::Validation { .. } => HttpResponse::BadRequest().json(serde_json::json!({
            "message": message
        })),
        OtpError::RateLimited {
            retry_after_seconds,
        } => HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", retry_after_seconds.to_string()))
            .json(serde_json::json!({ "message": message })),
        OtpError::ResendQuotaExceeded | OtpError::AttemptsExhausted => {
            HttpResponse::TooManyRequests().json(serde_json::json!({ "message": message }))
        }
        OtpError::InvalidCode { attempts_remaining } => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "message": message,
                "attemptsRemaining": attempts_remaining
            }))
        }
        OtpError::NotFoundOrExpired => {
            HttpResponse::BadRequest().json(serde_json::json!({ "message": message }))
        }
        OtpError::NotifierFailure { .. } => {
            HttpResponse::BadGateway().json(serde_json::json!({ "message": message }))
        }
    }
}
