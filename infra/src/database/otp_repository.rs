//! MySQL OTP record repository
//!
//! Backing table:
//!
//! ```sql
//! CREATE TABLE otp_codes (
//!     id         CHAR(36)     NOT NULL PRIMARY KEY,
//!     identifier VARCHAR(255) NOT NULL,
//!     channel    ENUM('email', 'phone') NOT NULL,
//!     code       CHAR(6)      NOT NULL,
//!     attempts   INT          NOT NULL DEFAULT 0,
//!     resends    INT          NOT NULL DEFAULT 0,
//!     created_at DATETIME(3)  NOT NULL,
//!     expires_at DATETIME(3)  NOT NULL,
//!     KEY idx_identifier_channel (identifier, channel, expires_at)
//! );
//! ```
//!
//! The supersede (delete prior + insert replacement) and the attempts
//! increment each run inside a transaction, so concurrent sends cannot leave
//! two live records for a pair and concurrent wrong guesses cannot lose
//! counter updates. Expired rows are ignored by every read and reaped
//! opportunistically via `delete_expired`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};
use tracing::{debug, error};
use uuid::Uuid;

use sd_core::domain::entities::otp_record::{ContactChannel, OtpRecord};
use sd_core::errors::DomainError;
use sd_core::repositories::OtpRepository;
use sd_shared::utils::validation::mask_identifier;

/// MySQL-backed OTP record store
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: Pool<MySql>,
}

impl MySqlOtpRepository {
    /// Create a new OTP repository
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<OtpRecord, DomainError> {
        let id: String = row.try_get("id").map_err(internal)?;
        let channel: String = row.try_get("channel").map_err(internal)?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Corrupt record id in otp_codes: {e}"),
            })?,
            identifier: row.try_get("identifier").map_err(internal)?,
            channel: ContactChannel::parse(&channel).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown channel value in otp_codes: {channel}"),
            })?,
            code: row.try_get("code").map_err(internal)?,
            attempts: row.try_get("attempts").map_err(internal)?,
            resends: row.try_get("resends").map_err(internal)?,
            created_at: row.try_get("created_at").map_err(internal)?,
            expires_at: row.try_get("expires_at").map_err(internal)?,
        })
    }
}

fn internal(e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Database error: {e}"),
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn find_valid(
        &self,
        identifier: &str,
        channel: ContactChannel,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = r#"
            SELECT id, identifier, channel, code, attempts, resends,
                   created_at, expires_at
            FROM otp_codes
            WHERE identifier = ? AND channel = ? AND expires_at > ?
            ORDER BY created_at ASC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(identifier)
            .bind(channel.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    identifier = %mask_identifier(identifier),
                    error = %e,
                    "Failed to look up OTP record"
                );
                internal(e)
            })?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => {
                debug!(
                    identifier = %mask_identifier(identifier),
                    channel = %channel,
                    "No valid OTP record found"
                );
                Ok(None)
            }
        }
    }

    async fn replace(&self, record: OtpRecord, prior: Option<Uuid>) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(internal)?;

        if let Some(prior_id) = prior {
            sqlx::query("DELETE FROM otp_codes WHERE id = ?")
                .bind(prior_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(internal)?;
        }

        sqlx::query(
            r#"
            INSERT INTO otp_codes (
                id, identifier, channel, code, attempts, resends,
                created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.identifier)
        .bind(record.channel.as_str())
        .bind(&record.code)
        .bind(record.attempts)
        .bind(record.resends)
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                identifier = %mask_identifier(&record.identifier),
                error = %e,
                "Failed to store OTP record"
            );
            internal(e)
        })?;

        tx.commit().await.map_err(internal)?;

        debug!(
            identifier = %mask_identifier(&record.identifier),
            channel = %record.channel,
            superseded = prior.is_some(),
            "Stored OTP record"
        );

        Ok(())
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<i32, DomainError> {
        let mut tx = self.pool.begin().await.map_err(internal)?;
        let id = id.to_string();

        let result = sqlx::query("UPDATE otp_codes SET attempts = attempts + 1 WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(internal)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("otp record {id}"),
            });
        }

        let attempts: i32 = sqlx::query("SELECT attempts FROM otp_codes WHERE id = ?")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await
            .map_err(internal)?
            .try_get("attempts")
            .map_err(internal)?;

        tx.commit().await.map_err(internal)?;

        Ok(attempts)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM otp_codes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(internal)?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM otp_codes WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(internal)?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged, "Reaped expired OTP records");
        }

        Ok(purged)
    }
}
