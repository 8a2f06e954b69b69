//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the SignupDesk
//! application. It provides concrete implementations for the interfaces the
//! core crate defines:
//!
//! - **Database**: MySQL OTP store using SQLx
//! - **Notifier**: delivery channel implementations (console mock, HTTP
//!   gateway)
//! - **Rate limiting**: in-process sliding-window limiter
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core error types for convenience
pub use sd_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Notifier module - delivery channel implementations
pub mod notifier;

/// Rate limiting module - in-process sliding-window limiter
pub mod rate_limit;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services

    use sd_shared::config::{DatabaseConfig, RateLimitConfig};
    use serde::{Deserialize, Serialize};

    /// Infrastructure configuration settings
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct InfrastructureConfig {
        /// Database configuration
        pub database: DatabaseConfig,
        /// Rate limiting configuration
        pub rate_limit: RateLimitConfig,
        /// Notification channel configuration
        pub notifier: NotifierConfig,
    }

    /// Notification channel configuration
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NotifierConfig {
        /// Notifier provider ("http", "mock")
        pub provider: String,
        /// Gateway endpoint for the HTTP provider
        pub gateway_url: String,
        /// API key for the HTTP provider
        pub api_key: String,
        /// Request timeout in seconds
        pub request_timeout_secs: u64,
    }

    impl Default for NotifierConfig {
        fn default() -> Self {
            Self {
                provider: "mock".to_string(),
                gateway_url: String::new(),
                api_key: String::new(),
                request_timeout_secs: 30,
            }
        }
    }

    impl NotifierConfig {
        /// Load notifier configuration from environment variables
        pub fn from_env() -> Self {
            Self {
                provider: std::env::var("NOTIFIER_PROVIDER")
                    .unwrap_or_else(|_| "mock".to_string()),
                gateway_url: std::env::var("NOTIFIER_GATEWAY_URL").unwrap_or_default(),
                api_key: std::env::var("NOTIFIER_API_KEY").unwrap_or_default(),
                request_timeout_secs: std::env::var("NOTIFIER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            }
        }
    }

    impl InfrastructureConfig {
        /// Load infrastructure configuration from environment variables
        pub fn from_env() -> Self {
            dotenvy::dotenv().ok();

            Self {
                database: DatabaseConfig::from_env(),
                rate_limit: RateLimitConfig::from_env(),
                notifier: NotifierConfig::from_env(),
            }
        }
    }

    impl Default for InfrastructureConfig {
        fn default() -> Self {
            Self {
                database: DatabaseConfig::default(),
                rate_limit: RateLimitConfig::default(),
                notifier: NotifierConfig::default(),
            }
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification channel error
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}
