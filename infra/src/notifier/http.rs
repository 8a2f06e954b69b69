//! HTTP gateway notifier
//!
//! Relays messages to an external delivery gateway (email or SMS) over
//! HTTPS. Unlike the mock, failures here are real and propagate to the
//! caller, which decides whether to surface or swallow them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use sd_core::services::otp::Notifier;
use sd_shared::utils::validation::mask_identifier;

use crate::InfrastructureError;

/// HTTP notifier configuration
#[derive(Debug, Clone)]
pub struct HttpNotifierConfig {
    /// Gateway endpoint messages are POSTed to
    pub gateway_url: String,
    /// Bearer token for the gateway
    pub api_key: String,
    /// Timeout for gateway requests in seconds
    pub request_timeout_secs: u64,
}

impl HttpNotifierConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let gateway_url = std::env::var("NOTIFIER_GATEWAY_URL")
            .map_err(|_| InfrastructureError::Config("NOTIFIER_GATEWAY_URL not set".to_string()))?;
        let api_key = std::env::var("NOTIFIER_API_KEY")
            .map_err(|_| InfrastructureError::Config("NOTIFIER_API_KEY not set".to_string()))?;

        Ok(Self {
            gateway_url,
            api_key,
            request_timeout_secs: std::env::var("NOTIFIER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

#[derive(Debug, Serialize)]
struct GatewayRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(rename = "messageId")]
    message_id: Option<String>,
}

/// Notifier delivering through an HTTP gateway
pub struct HttpNotifier {
    client: reqwest::Client,
    config: HttpNotifierConfig,
}

impl HttpNotifier {
    /// Create a new HTTP notifier
    pub fn new(config: HttpNotifierConfig) -> Result<Self, InfrastructureError> {
        if config.gateway_url.is_empty() {
            return Err(InfrastructureError::Config(
                "notifier gateway URL must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(gateway = %config.gateway_url, "HTTP notifier initialized");

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(HttpNotifierConfig::from_env()?)
    }

    async fn dispatch(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let request = GatewayRequest {
            to: recipient,
            subject,
            body,
        };

        debug!(
            recipient = %mask_identifier(recipient),
            "Dispatching message through HTTP gateway"
        );

        let response = self
            .client
            .post(&self.config.gateway_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(
                recipient = %mask_identifier(recipient),
                status = %status,
                "Gateway rejected message"
            );
            return Err(InfrastructureError::Notifier(format!(
                "gateway returned {status}: {detail}"
            )));
        }

        // Gateways without a JSON body still count as delivered
        let message_id = response
            .json::<GatewayResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id)
            .unwrap_or_else(|| format!("http-{}", Uuid::new_v4()));

        info!(
            recipient = %mask_identifier(recipient),
            message_id = %message_id,
            "Message accepted by gateway"
        );

        Ok(message_id)
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<String, String> {
        self.dispatch(recipient, subject, body)
            .await
            .map_err(|e| e.to_string())
    }
}
