//! Application factory
//!
//! Builds the Actix application with all routes and middleware wired up.
//! Generic over the store/notifier/clock traits so tests can drop in the
//! in-memory implementations.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware::Logger, web, App, Error, HttpResponse};

use sd_core::repositories::OtpRepository;
use sd_core::services::clock::Clock;
use sd_core::services::otp::Notifier;
use sd_core::services::rate_limit::RateLimiterTrait;

use crate::middleware::cors::create_cors;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::otp::{send_otp, verify_otp, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<R, N, C>(
    app_state: web::Data<AppState<R, N, C>>,
    rate_limiter: Arc<dyn RateLimiterTrait>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    R: OtpRepository + 'static,
    N: Notifier + 'static,
    C: Clock + 'static,
{
    let cors = create_cors();

    // Malformed JSON bodies answer with the same shape as other bad requests
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "message": "Invalid request" })),
        )
        .into()
    });

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // OTP API routes
        .service(
            web::scope("/api")
                .service(
                    web::resource("/send-otp")
                        .wrap(RateLimit::new(rate_limiter))
                        .route(web::post().to(send_otp::<R, N, C>)),
                )
                .service(
                    web::resource("/verify-otp").route(web::post().to(verify_otp::<R, N, C>)),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "signupdesk-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
