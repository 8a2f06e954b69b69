//! In-process sliding-window rate limiter
//!
//! Bounds request frequency per client address for the OTP send endpoint.
//! Counters live in process memory and reset on restart; multi-instance
//! coordination is explicitly out of scope. The per-identifier resend quota
//! on the OTP records is a separate, stricter control.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::warn;

use sd_core::errors::DomainError;
use sd_core::services::clock::Clock;
use sd_core::services::rate_limit::{RateLimitDecision, RateLimiterTrait};
use sd_shared::config::RateLimitConfig;

/// Sliding-window rate limiter keyed by client address
pub struct SlidingWindowRateLimiter<C: Clock> {
    windows: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
    config: RateLimitConfig,
    clock: Arc<C>,
}

impl<C: Clock> SlidingWindowRateLimiter<C> {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig, clock: Arc<C>) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
            clock,
        }
    }

    fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::seconds(self.config.window_seconds as i64)
    }
}

#[async_trait]
impl<C: Clock> RateLimiterTrait for SlidingWindowRateLimiter<C> {
    async fn check(&self, client_addr: &str) -> Result<RateLimitDecision, DomainError> {
        if !self.config.enabled {
            return Ok(RateLimitDecision::Allowed {
                remaining: self.config.requests_per_window,
            });
        }

        let now = self.clock.now();
        let window_start = self.window_start(now);
        let limit = self.config.requests_per_window;

        let mut windows = self.windows.lock().map_err(|_| DomainError::Internal {
            message: "rate limiter state poisoned".to_string(),
        })?;

        let entries = windows.entry(client_addr.to_string()).or_default();

        // Drop timestamps that slid out of the window
        while entries.front().is_some_and(|t| *t <= window_start) {
            entries.pop_front();
        }

        if entries.len() as u32 >= limit {
            // The window frees up once its oldest request ages out
            let retry_after_seconds = entries
                .front()
                .map(|oldest| {
                    let free_at = *oldest + Duration::seconds(self.config.window_seconds as i64);
                    (free_at - now).num_seconds().max(1) as u64
                })
                .unwrap_or(self.config.window_seconds);

            warn!(
                client_addr = client_addr,
                limit = limit,
                window_seconds = self.config.window_seconds,
                event = "rate_limit_exceeded",
                "OTP request rate limit exceeded"
            );

            return Ok(RateLimitDecision::Limited {
                retry_after_seconds,
            });
        }

        entries.push_back(now);
        Ok(RateLimitDecision::Allowed {
            remaining: limit - entries.len() as u32,
        })
    }
}
