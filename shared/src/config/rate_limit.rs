//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Rate limiting configuration for the OTP endpoints
///
/// These limits bound request frequency per client address. They are
/// independent of the per-identifier resend quota, which is tracked on the
/// OTP records themselves and survives address changes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Max OTP send requests per client address per window
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: u32,

    /// Rolling window duration in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests_per_window: default_requests_per_window(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("RATE_LIMIT_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let requests_per_window = std::env::var("RATE_LIMIT_REQUESTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_requests_per_window);
        let window_seconds = std::env::var("RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_window_seconds);

        Self {
            enabled,
            requests_per_window,
            window_seconds,
        }
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            requests_per_window: 100,
            ..Default::default()
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_requests_per_window() -> u32 {
    5
}

fn default_window_seconds() -> u64 {
    180
}
