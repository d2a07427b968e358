//! Repository for the `otps` table.
//!
//! One row per (destination, purpose); issuing a new code overwrites the old one.

use influx_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::otp::Otp;

const COLUMNS: &str = "id, destination, purpose, code_hash, attempts, expires_at, \
                       consumed_at, sent_at";

pub struct OtpRepo;

impl OtpRepo {
    /// Store a freshly issued code, resetting attempts and consumption.
    pub async fn upsert(
        pool: &PgPool,
        destination: &str,
        purpose: &str,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Otp, sqlx::Error> {
        let query = format!(
            "INSERT INTO otps (destination, purpose, code_hash, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (destination, purpose) DO UPDATE SET
                code_hash = EXCLUDED.code_hash,
                expires_at = EXCLUDED.expires_at,
                attempts = 0,
                consumed_at = NULL,
                sent_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Otp>(&query)
            .bind(destination)
            .bind(purpose)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Latest code for a destination and purpose, consumed or not.
    pub async fn find(
        pool: &PgPool,
        destination: &str,
        purpose: &str,
    ) -> Result<Option<Otp>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM otps WHERE destination = $1 AND purpose = $2");
        sqlx::query_as::<_, Otp>(&query)
            .bind(destination)
            .bind(purpose)
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_attempts(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE otps SET attempts = attempts + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a code used. Returns `false` if it was already consumed, so a
    /// code can only ever be redeemed once.
    pub async fn consume(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE otps SET consumed_at = NOW() WHERE id = $1 AND consumed_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete codes that expired more than an hour ago.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM otps WHERE expires_at < NOW() - INTERVAL '1 hour'")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
