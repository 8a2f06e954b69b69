//! Mock notifier for development and demos

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use sd_core::services::otp::Notifier;
use sd_shared::utils::validation::mask_identifier;

/// Notifier that logs messages instead of delivering them
///
/// Always reports success. The full body (code included) goes to the log so
/// the flow can be exercised end to end without a real delivery channel.
pub struct MockNotifier;

impl MockNotifier {
    /// Create a new mock notifier
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<String, String> {
        let message_id = format!("mock-{}", Uuid::new_v4());

        info!(
            recipient = %mask_identifier(recipient),
            subject = subject,
            message_id = %message_id,
            "Mock notifier: message would be sent"
        );
        // Demo diagnostics: surface the body (and thus the code) in the log
        info!(recipient = recipient, body = body, "Mock notifier payload");

        Ok(message_id)
    }
}
