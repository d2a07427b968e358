//! Repository for the `credit_transactions` ledger.
//!
//! Referral rewards start `pending`. A redemption consolidates every pending
//! reward into one `redemption` row (`processing`) and marks the rewards
//! `redeemed`. Settling the redemption as failed returns them to `pending`.

use influx_core::referral::{
    self, PayoutOutcome, TXN_PENDING, TXN_PROCESSING, TXN_REDEEMED, TXN_REDEMPTION,
    TXN_REFERRAL_REWARD,
};
use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::credit_transaction::{CreditTransaction, ReferralTotals};

const COLUMNS: &str = "id, influencer_id, transaction_type, amount, status, \
                       referred_influencer_id, redemption_id, upi_id, processed_at, \
                       created_at, updated_at";

/// Result of a redemption request.
#[derive(Debug)]
pub enum RedeemOutcome {
    Redeemed(CreditTransaction),
    /// Pending balance is below the minimum; nothing was written.
    BelowMinimum { available: i64 },
}

pub struct CreditTransactionRepo;

impl CreditTransactionRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CreditTransaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM credit_transactions WHERE id = $1");
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The influencer's ledger, newest first.
    pub async fn list_for_influencer(
        pool: &PgPool,
        influencer_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_transactions
             WHERE influencer_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(influencer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Pending, in-payout and paid totals plus the number of referrals made.
    pub async fn totals(pool: &PgPool, influencer_id: DbId) -> Result<ReferralTotals, sqlx::Error> {
        sqlx::query_as::<_, ReferralTotals>(
            "SELECT
                COALESCE(SUM(amount) FILTER (
                    WHERE transaction_type = 'referral_reward' AND status = 'pending'), 0)::BIGINT
                    AS pending,
                COALESCE(SUM(amount) FILTER (
                    WHERE transaction_type = 'redemption' AND status = 'processing'), 0)::BIGINT
                    AS in_payout,
                COALESCE(SUM(amount) FILTER (
                    WHERE transaction_type = 'redemption' AND status = 'paid'), 0)::BIGINT
                    AS paid,
                (SELECT COUNT(*) FROM influencers WHERE referred_by_id = $1) AS referral_count
             FROM credit_transactions
             WHERE influencer_id = $1",
        )
        .bind(influencer_id)
        .fetch_one(pool)
        .await
    }

    /// Consolidate all pending rewards into a single redemption request.
    pub async fn redeem(
        pool: &PgPool,
        influencer_id: DbId,
        upi_id: &str,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let pending: Vec<(DbId, i64)> = sqlx::query_as(
            "SELECT id, amount FROM credit_transactions
             WHERE influencer_id = $1 AND transaction_type = $2 AND status = $3
             ORDER BY id
             FOR UPDATE",
        )
        .bind(influencer_id)
        .bind(TXN_REFERRAL_REWARD)
        .bind(TXN_PENDING)
        .fetch_all(&mut *tx)
        .await?;

        let amounts: Vec<i64> = pending.iter().map(|(_, amount)| *amount).collect();
        let total = match referral::redemption_total(&amounts) {
            Ok(total) => total,
            Err(_) => {
                return Ok(RedeemOutcome::BelowMinimum {
                    available: amounts.iter().sum(),
                })
            }
        };

        let query = format!(
            "INSERT INTO credit_transactions (influencer_id, transaction_type, amount, status, upi_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let redemption = sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(influencer_id)
            .bind(TXN_REDEMPTION)
            .bind(total)
            .bind(TXN_PROCESSING)
            .bind(upi_id)
            .fetch_one(&mut *tx)
            .await?;

        let ids: Vec<DbId> = pending.iter().map(|(id, _)| *id).collect();
        sqlx::query(
            "UPDATE credit_transactions SET status = $2, redemption_id = $3
             WHERE id = ANY($1)",
        )
        .bind(&ids)
        .bind(TXN_REDEEMED)
        .bind(redemption.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RedeemOutcome::Redeemed(redemption))
    }

    /// Redemption requests, oldest first, optionally filtered by status.
    pub async fn list_redemptions(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_transactions
             WHERE transaction_type = 'redemption'
               AND ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Settle a processing redemption. A failed payout releases the
    /// consolidated rewards back to `pending`.
    ///
    /// Returns `None` if the row is not a processing redemption.
    pub async fn settle(
        pool: &PgPool,
        id: DbId,
        outcome: PayoutOutcome,
    ) -> Result<Option<CreditTransaction>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE credit_transactions SET status = $2, processed_at = NOW()
             WHERE id = $1 AND transaction_type = $3 AND status = $4
             RETURNING {COLUMNS}"
        );
        let Some(redemption) = sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(id)
            .bind(outcome.as_str())
            .bind(TXN_REDEMPTION)
            .bind(TXN_PROCESSING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if outcome == PayoutOutcome::Failed {
            sqlx::query(
                "UPDATE credit_transactions SET status = $2, redemption_id = NULL
                 WHERE redemption_id = $1",
            )
            .bind(id)
            .bind(TXN_PENDING)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(redemption))
    }
}
