//! End-to-end handler tests for the OTP endpoints
//!
//! Runs the real application factory against the in-memory repository and a
//! stub notifier, covering the request/response contract of both endpoints.

use std::sync::Arc;

use actix_web::{test, web};
use async_trait::async_trait;
use serde_json::{json, Value};

use sd_api::app::create_app;
use sd_api::routes::otp::AppState;
use sd_core::domain::entities::otp_record::ContactChannel;
use sd_core::repositories::{InMemoryOtpRepository, OtpRepository};
use sd_core::services::clock::SystemClock;
use sd_core::services::otp::{Notifier, OtpIssuer, OtpServiceConfig, OtpVerifier};
use sd_core::services::rate_limit::RateLimiterTrait;
use sd_infra::rate_limit::SlidingWindowRateLimiter;
use sd_shared::config::RateLimitConfig;

/// Notifier stub that always accepts the message
struct TestNotifier;

#[async_trait]
impl Notifier for TestNotifier {
    async fn send(&self, _recipient: &str, _subject: &str, _body: &str) -> Result<String, String> {
        Ok(format!("test-{}", uuid::Uuid::new_v4()))
    }
}

type TestState = web::Data<AppState<InMemoryOtpRepository, TestNotifier, SystemClock>>;

fn test_state() -> (TestState, Arc<InMemoryOtpRepository>) {
    let repository = Arc::new(InMemoryOtpRepository::new());
    let clock = Arc::new(SystemClock);
    let issuer = Arc::new(OtpIssuer::new(
        repository.clone(),
        Arc::new(TestNotifier),
        clock.clone(),
        OtpServiceConfig::default(),
    ));
    let verifier = Arc::new(OtpVerifier::new(repository.clone(), clock));
    (web::Data::new(AppState { issuer, verifier }), repository)
}

fn limiter(config: RateLimitConfig) -> Arc<dyn RateLimiterTrait> {
    Arc::new(SlidingWindowRateLimiter::new(config, Arc::new(SystemClock)))
}

/// Limiter that stays out of the way so quota behavior can be observed
fn lenient_limiter() -> Arc<dyn RateLimiterTrait> {
    limiter(RateLimitConfig {
        requests_per_window: 1000,
        ..Default::default()
    })
}

async fn issued_code(repository: &InMemoryOtpRepository, identifier: &str, channel: ContactChannel) -> String {
    repository
        .find_valid(identifier, channel, chrono::Utc::now())
        .await
        .unwrap()
        .expect("a live OTP record")
        .code
}

#[actix_web::test]
async fn test_health_endpoint() {
    let (state, _) = test_state();
    let app = test::init_service(create_app(state, lenient_limiter())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_send_otp_response_shape() {
    let (state, _) = test_state();
    let app = test::init_service(create_app(state, lenient_limiter())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "user@example.com", "type": "email" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["attemptsRemaining"], 10);
    assert_eq!(body["resendRemaining"], 5);
}

#[actix_web::test]
async fn test_email_verification_round_trip() {
    let (state, repository) = test_state();
    let app = test::init_service(create_app(state, lenient_limiter())).await;

    // Issue
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "user@example.com", "type": "email" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let code = issued_code(&repository, "user@example.com", ContactChannel::Email).await;
    let wrong = if code == "111111" { "222222" } else { "111111" };

    // Wrong code burns one attempt
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/verify-otp")
            .set_json(json!({
                "identifier": "user@example.com", "type": "email", "code": wrong
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid OTP");
    assert_eq!(body["attemptsRemaining"], 9);

    // Correct code verifies
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/verify-otp")
            .set_json(json!({
                "identifier": "user@example.com", "type": "email", "code": code
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    // The record is consumed: replaying the same code fails
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/verify-otp")
            .set_json(json!({
                "identifier": "user@example.com", "type": "email", "code": code
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired OTP");
}

#[actix_web::test]
async fn test_resend_quota_blocks_after_five_resends() {
    let (state, _) = test_state();
    let app = test::init_service(create_app(state, lenient_limiter())).await;

    let send = || {
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "9876543210", "type": "phone" }))
            .to_request()
    };

    // Initial issue plus five resends all succeed, counting down the quota
    for expected_remaining in (0..=5).rev() {
        let resp = test::call_service(&app, send()).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["resendRemaining"], expected_remaining);
    }

    // The next issue for the chain is refused
    let resp = test::call_service(&app, send()).await;
    assert_eq!(resp.status(), 429);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Maximum resend limit reached");
}

#[actix_web::test]
async fn test_attempts_exhaustion_returns_429() {
    let (state, repository) = test_state();
    let app = test::init_service(create_app(state, lenient_limiter())).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "9876543210", "type": "phone" }))
            .to_request(),
    )
    .await;

    let code = issued_code(&repository, "9876543210", ContactChannel::Phone).await;
    let wrong = if code == "111111" { "222222" } else { "111111" };

    for _ in 0..10 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/verify-otp")
                .set_json(json!({
                    "identifier": "9876543210", "type": "phone", "code": wrong
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    // Quota spent: even the correct code is refused now
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/verify-otp")
            .set_json(json!({
                "identifier": "9876543210", "type": "phone", "code": code
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 429);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Maximum attempts exceeded");
}

#[actix_web::test]
async fn test_rate_limit_caps_send_requests() {
    let (state, _) = test_state();
    // Default config: 5 requests per rolling 3 minutes per client address
    let app = test::init_service(create_app(state, limiter(RateLimitConfig::default()))).await;

    for i in 0..5 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/send-otp")
                .set_json(json!({
                    "identifier": format!("user{i}@example.com"), "type": "email"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "user6@example.com", "type": "email" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 429);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Too many OTP requests, please try again later.");
}

#[actix_web::test]
async fn test_rate_limit_does_not_gate_verify() {
    let (state, repository) = test_state();
    let app = test::init_service(create_app(state, limiter(RateLimitConfig::default()))).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "user@example.com", "type": "email" }))
            .to_request(),
    )
    .await;
    let code = issued_code(&repository, "user@example.com", ContactChannel::Email).await;
    let wrong = if code == "111111" { "222222" } else { "111111" };

    // Verification attempts are bounded by the per-record quota, not the
    // send-endpoint window
    for _ in 0..8 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/verify-otp")
                .set_json(json!({
                    "identifier": "user@example.com", "type": "email", "code": wrong
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }
}

#[actix_web::test]
async fn test_malformed_requests_are_rejected() {
    let (state, _) = test_state();
    let app = test::init_service(create_app(state, lenient_limiter())).await;

    // Unknown channel
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "user@example.com", "type": "carrier" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid request");

    // Missing identifier
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "type": "email" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    // Ill-shaped code
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/verify-otp")
            .set_json(json!({
                "identifier": "user@example.com", "type": "email", "code": "123"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid request");

    // Identifier that does not match its channel
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({ "identifier": "not-a-phone", "type": "phone" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let (state, _) = test_state();
    let app = test::init_service(create_app(state, lenient_limiter())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/nope").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}
