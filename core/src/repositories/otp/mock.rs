//! In-memory implementation of OtpRepository for tests and demos

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp_record::{ContactChannel, OtpRecord};
use crate::errors::DomainError;

use super::trait_::OtpRepository;

/// In-memory OTP repository backed by a write-locked map
///
/// The single lock serializes `replace` and `increment_attempts`, giving the
/// same atomicity the MySQL implementation gets from transactions.
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<HashMap<Uuid, OtpRecord>>>,
}

impl InMemoryOtpRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of records currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the repository holds no records at all
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryOtpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn find_valid(
        &self,
        identifier: &str,
        channel: ContactChannel,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| {
                r.identifier == identifier && r.channel == channel && !r.is_expired(now)
            })
            .min_by_key(|r| r.created_at)
            .cloned())
    }

    async fn replace(&self, record: OtpRecord, prior: Option<Uuid>) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if let Some(prior_id) = prior {
            records.remove(&prior_id);
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<i32, DomainError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("otp record {id}"),
        })?;
        record.attempts += 1;
        Ok(record.attempts)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.records.write().await.remove(&id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !r.is_expired(now));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn email_record(identifier: &str, now: DateTime<Utc>) -> OtpRecord {
        OtpRecord::new(identifier.to_string(), ContactChannel::Email, now)
    }

    #[tokio::test]
    async fn test_find_valid_filters_expired() {
        let repo = InMemoryOtpRepository::new();
        let now = Utc::now();

        let record = email_record("user@example.com", now);
        repo.replace(record.clone(), None).await.unwrap();

        let found = repo
            .find_valid("user@example.com", ContactChannel::Email, now)
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(record.id));

        let after_expiry = now + Duration::minutes(6);
        let found = repo
            .find_valid("user@example.com", ContactChannel::Email, after_expiry)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_valid_is_channel_scoped() {
        let repo = InMemoryOtpRepository::new();
        let now = Utc::now();

        let record = email_record("user@example.com", now);
        repo.replace(record, None).await.unwrap();

        let found = repo
            .find_valid("user@example.com", ContactChannel::Phone, now)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_valid_prefers_oldest() {
        let repo = InMemoryOtpRepository::new();
        let now = Utc::now();

        let older = email_record("user@example.com", now - Duration::minutes(1));
        let newer = email_record("user@example.com", now);
        repo.replace(older.clone(), None).await.unwrap();
        repo.replace(newer, None).await.unwrap();

        let found = repo
            .find_valid("user@example.com", ContactChannel::Email, now)
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(older.id));
    }

    #[tokio::test]
    async fn test_replace_removes_prior() {
        let repo = InMemoryOtpRepository::new();
        let now = Utc::now();

        let first = email_record("user@example.com", now);
        repo.replace(first.clone(), None).await.unwrap();

        let second = first.reissued(now, 5);
        repo.replace(second.clone(), Some(first.id)).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let found = repo
            .find_valid("user@example.com", ContactChannel::Email, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, second.id);
        assert_eq!(found.resends, 1);
    }

    #[tokio::test]
    async fn test_increment_attempts_returns_new_count() {
        let repo = InMemoryOtpRepository::new();
        let now = Utc::now();

        let record = email_record("user@example.com", now);
        repo.replace(record.clone(), None).await.unwrap();

        assert_eq!(repo.increment_attempts(record.id).await.unwrap(), 1);
        assert_eq!(repo.increment_attempts(record.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_increment_attempts_missing_record() {
        let repo = InMemoryOtpRepository::new();
        let result = repo.increment_attempts(Uuid::new_v4()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_expired_purges_only_expired() {
        let repo = InMemoryOtpRepository::new();
        let now = Utc::now();

        let stale = email_record("old@example.com", now - Duration::minutes(10));
        let live = email_record("new@example.com", now);
        repo.replace(stale, None).await.unwrap();
        repo.replace(live, None).await.unwrap();

        let purged = repo.delete_expired(now).await.unwrap();
        assert_eq!(purged, 1);
        assert_eq!(repo.len().await, 1);
    }
}
