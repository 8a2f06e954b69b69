//! Unit tests for the OTP issuer

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::otp_record::{ContactChannel, MAX_ATTEMPTS, MAX_RESENDS};
use crate::errors::{DomainError, OtpError};
use crate::repositories::{InMemoryOtpRepository, OtpRepository};
use crate::services::clock::{Clock, ManualClock};
use crate::services::otp::{OtpIssuer, OtpServiceConfig};

use super::mocks::MockNotifier;

fn issuer_with(
    notifier_fails: bool,
) -> (
    OtpIssuer<InMemoryOtpRepository, MockNotifier, ManualClock>,
    Arc<InMemoryOtpRepository>,
    Arc<MockNotifier>,
    Arc<ManualClock>,
) {
    let repository = Arc::new(InMemoryOtpRepository::new());
    let notifier = Arc::new(MockNotifier::new(notifier_fails));
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let issuer = OtpIssuer::new(
        repository.clone(),
        notifier.clone(),
        clock.clone(),
        OtpServiceConfig::default(),
    );
    (issuer, repository, notifier, clock)
}

#[tokio::test]
async fn test_issue_creates_single_valid_record() {
    let (issuer, repository, notifier, clock) = issuer_with(false);

    let outcome = issuer
        .issue("user@example.com", ContactChannel::Email)
        .await
        .unwrap();

    assert_eq!(outcome.attempts_remaining, MAX_ATTEMPTS);
    assert_eq!(outcome.resend_remaining, MAX_RESENDS);
    assert!(outcome.was_delivered());

    let record = repository
        .find_valid("user@example.com", ContactChannel::Email, clock.now())
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(record.attempts, 0);
    assert_eq!(record.resends, 0);
    assert_eq!(repository.len().await, 1);

    // The code reaches the outside world only through the notifier
    let body = notifier.last_body("user@example.com").unwrap();
    assert!(body.contains(&record.code));
}

#[tokio::test]
async fn test_issue_twice_supersedes_and_counts_resend() {
    let (issuer, repository, _, clock) = issuer_with(false);

    issuer
        .issue("user@example.com", ContactChannel::Email)
        .await
        .unwrap();
    let first = repository
        .find_valid("user@example.com", ContactChannel::Email, clock.now())
        .await
        .unwrap()
        .unwrap();

    let outcome = issuer
        .issue("user@example.com", ContactChannel::Email)
        .await
        .unwrap();

    assert_eq!(outcome.resend_remaining, MAX_RESENDS - 1);
    assert_eq!(repository.len().await, 1);

    let second = repository
        .find_valid("user@example.com", ContactChannel::Email, clock.now())
        .await
        .unwrap()
        .unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.resends, 1);
    assert_eq!(second.attempts, 0);
}

#[tokio::test]
async fn test_sixth_issue_fails_without_mutation() {
    let (issuer, repository, _, clock) = issuer_with(false);

    for _ in 0..=MAX_RESENDS {
        issuer.issue("9876543210", ContactChannel::Phone).await.unwrap();
    }
    let before = repository
        .find_valid("9876543210", ContactChannel::Phone, clock.now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.resends, MAX_RESENDS);

    let result = issuer.issue("9876543210", ContactChannel::Phone).await;
    assert!(matches!(
        result,
        Err(DomainError::Otp(OtpError::ResendQuotaExceeded))
    ));

    // The blocked call performed no store mutation
    let after = repository
        .find_valid("9876543210", ContactChannel::Phone, clock.now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.code, before.code);
}

#[tokio::test]
async fn test_quota_resets_after_expiry() {
    let (issuer, _, _, clock) = issuer_with(false);

    for _ in 0..=MAX_RESENDS {
        issuer.issue("9876543210", ContactChannel::Phone).await.unwrap();
    }
    assert!(issuer.issue("9876543210", ContactChannel::Phone).await.is_err());

    clock.advance(Duration::minutes(6));

    let outcome = issuer
        .issue("9876543210", ContactChannel::Phone)
        .await
        .unwrap();
    assert_eq!(outcome.resend_remaining, MAX_RESENDS);
}

#[tokio::test]
async fn test_dispatch_failure_keeps_record() {
    let (issuer, repository, _, clock) = issuer_with(true);

    let outcome = issuer
        .issue("user@example.com", ContactChannel::Email)
        .await
        .unwrap();

    assert!(!outcome.was_delivered());
    assert!(repository
        .find_valid("user@example.com", ContactChannel::Email, clock.now())
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_email_is_normalized_before_storage() {
    let (issuer, repository, _, clock) = issuer_with(false);

    issuer
        .issue("  User@Example.COM ", ContactChannel::Email)
        .await
        .unwrap();

    assert!(repository
        .find_valid("user@example.com", ContactChannel::Email, clock.now())
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_invalid_identifiers_rejected() {
    let (issuer, repository, _, _) = issuer_with(false);

    let result = issuer.issue("not-an-email", ContactChannel::Email).await;
    assert!(matches!(
        result,
        Err(DomainError::Otp(OtpError::Validation { .. }))
    ));

    let result = issuer.issue("12345", ContactChannel::Phone).await;
    assert!(matches!(
        result,
        Err(DomainError::Otp(OtpError::Validation { .. }))
    ));

    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_channels_have_independent_chains() {
    let (issuer, repository, _, _) = issuer_with(false);

    // Same digit string as both an identifier-ish email and a phone number
    issuer.issue("9876543210", ContactChannel::Phone).await.unwrap();
    issuer.issue("user@example.com", ContactChannel::Email).await.unwrap();

    assert_eq!(repository.len().await, 2);
}
