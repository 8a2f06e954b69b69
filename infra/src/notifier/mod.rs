//! Notification channel implementations
//!
//! Delivery is best effort by contract: the issuer records the code before
//! dispatch and a failed send never rolls the record back. Two providers are
//! available:
//!
//! - **Mock**: logs the outgoing message instead of sending it. This is the
//!   demo configuration and the one place outside the delivery channel where
//!   codes may appear in diagnostics.
//! - **HTTP**: POSTs the message to a configured gateway (email/SMS relay)
//!   and propagates failure to the caller.

pub mod http;
pub mod mock;

pub use http::{HttpNotifier, HttpNotifierConfig};
pub use mock::MockNotifier;

use sd_core::services::otp::Notifier;

use crate::config::NotifierConfig;

/// Create a notifier based on configuration
///
/// Unknown providers and misconfigured gateways fall back to the mock
/// implementation so the service stays usable in development.
pub fn create_notifier(config: &NotifierConfig) -> Box<dyn Notifier> {
    match config.provider.as_str() {
        "mock" => Box::new(MockNotifier::new()),
        "http" => {
            let http_config = HttpNotifierConfig {
                gateway_url: config.gateway_url.clone(),
                api_key: config.api_key.clone(),
                request_timeout_secs: config.request_timeout_secs,
            };

            match HttpNotifier::new(http_config) {
                Ok(notifier) => Box::new(notifier),
                Err(e) => {
                    tracing::error!("Failed to initialize HTTP notifier: {}", e);
                    tracing::warn!("Falling back to mock notifier");
                    Box::new(MockNotifier::new())
                }
            }
        }
        other => {
            tracing::warn!("Unknown notifier provider '{}', using mock implementation", other);
            Box::new(MockNotifier::new())
        }
    }
}
