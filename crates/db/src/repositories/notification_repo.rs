//! Repository for the in-app `notifications` feed.

use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};

const COLUMNS: &str = "id, account_kind, account_id, kind, title, body, data, is_read, \
                       read_at, created_at";

pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (account_kind, account_id, kind, title, body, data)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(&input.account_kind)
            .bind(input.account_id)
            .bind(&input.kind)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.data)
            .fetch_one(pool)
            .await
    }

    /// Feed for an account, newest first.
    pub async fn list_for_account(
        pool: &PgPool,
        account_kind: &str,
        account_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE account_kind = $1 AND account_id = $2
               AND ($3 = false OR is_read = false)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(account_kind)
            .bind(account_id)
            .bind(unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn unread_count(
        pool: &PgPool,
        account_kind: &str,
        account_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications
             WHERE account_kind = $1 AND account_id = $2 AND is_read = false",
        )
        .bind(account_kind)
        .bind(account_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Mark one entry read. Returns `false` if it is not the caller's.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
        account_kind: &str,
        account_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = COALESCE(read_at, NOW())
             WHERE id = $1 AND account_kind = $2 AND account_id = $3",
        )
        .bind(id)
        .bind(account_kind)
        .bind(account_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every unread entry read. Returns the count updated.
    pub async fn mark_all_read(
        pool: &PgPool,
        account_kind: &str,
        account_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = NOW()
             WHERE account_kind = $1 AND account_id = $2 AND is_read = false",
        )
        .bind(account_kind)
        .bind(account_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
