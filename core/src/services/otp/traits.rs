//! Collaborator interface for code delivery

use async_trait::async_trait;

/// Notification channel for delivering verification codes
///
/// Implementations cover email and SMS delivery; the service composes the
/// subject and body, the notifier only moves the message. Failure is a value,
/// not a panic: callers decide whether to surface or swallow it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch a message, returning a provider message id on success
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<String, String>;
}

// Allow provider selection at runtime through a boxed notifier
#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<String, String> {
        (**self).send(recipient, subject, body).await
    }
}
