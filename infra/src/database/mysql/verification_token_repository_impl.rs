//! MySQL implementation of the VerificationTokenRepository trait.
//!
//! Tokens live in the `verification_tokens` table. Supersession and insert
//! share one transaction; consumption is a single conditional UPDATE so that
//! concurrent validators cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use authapi_core::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use authapi_core::errors::DomainError;
use authapi_core::repositories::VerificationTokenRepository;

const TOKEN_COLUMNS: &str =
    "id, subject_id, purpose, secret_hash, issued_at, expires_at, consumed, consumed_at";

/// MySQL implementation of VerificationTokenRepository
pub struct MySqlVerificationTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationTokenRepository {
    /// Create a new MySQL verification token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn db_error(context: &str, e: sqlx::Error) -> DomainError {
        tracing::error!(error = %e, context = context, "Verification token query failed");
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }

    /// Convert database row to VerificationToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<VerificationToken, DomainError> {
        let column = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        let id: String = row.try_get("id").map_err(|e| column("id", e))?;
        let purpose: String = row.try_get("purpose").map_err(|e| column("purpose", e))?;

        Ok(VerificationToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            subject_id: row.try_get("subject_id").map_err(|e| column("subject_id", e))?,
            purpose: purpose
                .parse::<TokenPurpose>()
                .map_err(|message| DomainError::Internal { message })?,
            secret_hash: row.try_get("secret_hash").map_err(|e| column("secret_hash", e))?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| column("issued_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column("expires_at", e))?,
            consumed: row.try_get("consumed").map_err(|e| column("consumed", e))?,
            consumed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("consumed_at")
                .map_err(|e| column("consumed_at", e))?,
        })
    }
}

#[async_trait]
impl VerificationTokenRepository for MySqlVerificationTokenRepository {
    async fn store_superseding(&self, token: VerificationToken) -> Result<u64, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::db_error("Failed to begin transaction", e))?;

        let superseded = sqlx::query(
            r#"
            UPDATE verification_tokens
            SET consumed = TRUE, consumed_at = ?
            WHERE subject_id = ? AND purpose = ? AND consumed = FALSE
            "#,
        )
        .bind(token.issued_at)
        .bind(&token.subject_id)
        .bind(token.purpose.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::db_error("Failed to supersede tokens", e))?
        .rows_affected();

        let insert = sqlx::query(
            r#"
            INSERT INTO verification_tokens (
                id, subject_id, purpose, secret_hash, issued_at, expires_at, consumed, consumed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(token.id.to_string())
        .bind(&token.subject_id)
        .bind(token.purpose.as_str())
        .bind(&token.secret_hash)
        .bind(token.issued_at)
        .bind(token.expires_at)
        .bind(token.consumed)
        .bind(token.consumed_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            let duplicate = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            // Dropping the transaction rolls back the supersede
            if duplicate {
                return Err(DomainError::Validation {
                    message: "Token already exists".to_string(),
                });
            }
            return Err(Self::db_error("Failed to save verification token", e));
        }

        tx.commit()
            .await
            .map_err(|e| Self::db_error("Failed to commit token transaction", e))?;

        Ok(superseded)
    }

    async fn find_by_secret_hash(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        secret_hash: &str,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM verification_tokens \
             WHERE secret_hash = ? AND subject_id = ? AND purpose = ? LIMIT 1",
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(secret_hash)
            .bind(subject_id)
            .bind(purpose.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::db_error("Failed to find verification token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn consume(&self, id: Uuid, consumed_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE verification_tokens
            SET consumed = TRUE, consumed_at = ?
            WHERE id = ? AND consumed = FALSE
            "#,
        )
        .bind(consumed_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_error("Failed to consume verification token", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_live(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<Vec<VerificationToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM verification_tokens \
             WHERE subject_id = ? AND purpose = ? AND consumed = FALSE AND expires_at >= ? \
             ORDER BY issued_at DESC",
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(subject_id)
            .bind(purpose.as_str())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::db_error("Failed to find live tokens", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < ?")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_error("Failed to delete expired tokens", e))?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            tracing::info!(deleted = deleted, event = "expired_tokens_deleted", "Deleted expired verification tokens");
        }
        Ok(deleted)
    }
}
