//! Rate limiting middleware for the OTP send endpoint
//!
//! Rejects requests with 429 before the handler runs once a client address
//! exceeds its window. The limiter itself lives behind
//! `sd_core::services::rate_limit::RateLimiterTrait`; this middleware only
//! extracts the client address and translates the decision into HTTP.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use sd_core::services::rate_limit::{RateLimitDecision, RateLimiterTrait};

/// Rate limiter middleware factory
pub struct RateLimit {
    limiter: Arc<dyn RateLimiterTrait>,
}

impl RateLimit {
    /// Create a new rate limiting middleware around a limiter implementation
    pub fn new(limiter: Arc<dyn RateLimiterTrait>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiterTrait>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();

        Box::pin(async move {
            let client_addr = extract_client_addr(req.request());

            match limiter.check(&client_addr).await {
                Ok(RateLimitDecision::Allowed { .. }) => {
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                Ok(RateLimitDecision::Limited {
                    retry_after_seconds,
                }) => {
                    log::warn!(
                        "Rate limit exceeded for {}, retry after {}s",
                        client_addr,
                        retry_after_seconds
                    );
                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("Retry-After", retry_after_seconds.to_string()))
                        .json(serde_json::json!({
                            "message": "Too many OTP requests, please try again later."
                        }))
                        .map_into_right_body();
                    Ok(req.into_response(response))
                }
                Err(error) => {
                    log::error!("Rate limiter failure for {}: {}", client_addr, error);
                    let response = HttpResponse::InternalServerError()
                        .json(serde_json::json!({ "message": "Internal server error" }))
                        .map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

/// Extract the client address from the request
///
/// Honors proxy headers before falling back to the peer address.
pub fn extract_client_addr(req: &HttpRequest) -> String {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(addr) = forwarded_str.split(',').next() {
                let addr = addr.trim();
                if !addr.is_empty() {
                    return addr.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(addr) = real_ip.to_str() {
            return addr.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
