//! Repository for the `profile_reviews` queue.

use influx_core::referral::{REFERRAL_REWARD_AMOUNT, TXN_PENDING, TXN_REFERRAL_REWARD};
use influx_core::review::{PROFILE_BRAND, PROFILE_INFLUENCER, REVIEW_APPROVED, REVIEW_REJECTED};
use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::credit_transaction::CreditTransaction;
use crate::models::profile_review::{ProfileReview, ReviewListParams};

const COLUMNS: &str = "id, profile_type, profile_id, status, reviewed_by, rejection_reason, \
                       submitted_at, reviewed_at, created_at, updated_at";

const TXN_COLUMNS: &str = "id, influencer_id, transaction_type, amount, status, \
                           referred_influencer_id, redemption_id, upi_id, processed_at, \
                           created_at, updated_at";

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// What an approval wrote besides the review row.
#[derive(Debug)]
pub struct Approval {
    pub review: ProfileReview,
    /// Reward credited to the referrer when an influencer profile is approved.
    pub referral_reward: Option<CreditTransaction>,
}

pub struct ProfileReviewRepo;

impl ProfileReviewRepo {
    /// Queue a profile for review.
    ///
    /// Returns `None` when a pending review already exists for the profile.
    pub async fn submit(
        pool: &PgPool,
        profile_type: &str,
        profile_id: DbId,
    ) -> Result<Option<ProfileReview>, sqlx::Error> {
        let query = format!(
            "INSERT INTO profile_reviews (profile_type, profile_id)
             VALUES ($1, $2)
             ON CONFLICT (profile_type, profile_id) WHERE status = 'pending' DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfileReview>(&query)
            .bind(profile_type)
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProfileReview>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profile_reviews WHERE id = $1");
        sqlx::query_as::<_, ProfileReview>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent review for a profile, in any status.
    pub async fn latest_for_profile(
        pool: &PgPool,
        profile_type: &str,
        profile_id: DbId,
    ) -> Result<Option<ProfileReview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profile_reviews
             WHERE profile_type = $1 AND profile_id = $2
             ORDER BY submitted_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ProfileReview>(&query)
            .bind(profile_type)
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }

    /// List reviews with optional status/type filters, oldest submission first.
    pub async fn list(
        pool: &PgPool,
        params: &ReviewListParams,
    ) -> Result<Vec<ProfileReview>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.profile_type.is_some() {
            conditions.push(format!("profile_type = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM profile_reviews {where_clause} \
             ORDER BY submitted_at ASC, id ASC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, ProfileReview>(&query);
        if let Some(ref status) = params.status {
            q = q.bind(status);
        }
        if let Some(ref profile_type) = params.profile_type {
            q = q.bind(profile_type);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Approve a pending review, verify the profile and, for a referred
    /// influencer, credit the referrer. All in one transaction.
    ///
    /// Returns `None` if the review is missing or no longer pending.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
    ) -> Result<Option<Approval>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE profile_reviews SET
                status = $2, reviewed_by = $3, reviewed_at = NOW(), rejection_reason = NULL
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let Some(review) = sqlx::query_as::<_, ProfileReview>(&query)
            .bind(id)
            .bind(REVIEW_APPROVED)
            .bind(admin_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut referral_reward = None;
        match review.profile_type.as_str() {
            PROFILE_INFLUENCER => {
                sqlx::query("UPDATE influencers SET is_verified = true WHERE id = $1")
                    .bind(review.profile_id)
                    .execute(&mut *tx)
                    .await?;

                let reward_query = format!(
                    "INSERT INTO credit_transactions
                        (influencer_id, transaction_type, amount, status, referred_influencer_id)
                     SELECT r.id, $2, $3, $4, i.id
                     FROM influencers i
                     JOIN influencers r ON r.id = i.referred_by_id AND r.is_active = true
                     WHERE i.id = $1
                     ON CONFLICT (referred_influencer_id)
                        WHERE transaction_type = 'referral_reward' DO NOTHING
                     RETURNING {TXN_COLUMNS}"
                );
                referral_reward = sqlx::query_as::<_, CreditTransaction>(&reward_query)
                    .bind(review.profile_id)
                    .bind(TXN_REFERRAL_REWARD)
                    .bind(REFERRAL_REWARD_AMOUNT)
                    .bind(TXN_PENDING)
                    .fetch_optional(&mut *tx)
                    .await?;
            }
            PROFILE_BRAND => {
                sqlx::query("UPDATE brands SET is_verified = true WHERE id = $1")
                    .bind(review.profile_id)
                    .execute(&mut *tx)
                    .await?;
            }
            _ => {}
        }

        tx.commit().await?;
        Ok(Some(Approval {
            review,
            referral_reward,
        }))
    }

    /// Reject a pending review with a reason.
    ///
    /// Returns `None` if the review is missing or no longer pending.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
        reason: &str,
    ) -> Result<Option<ProfileReview>, sqlx::Error> {
        let query = format!(
            "UPDATE profile_reviews SET
                status = $2, reviewed_by = $3, reviewed_at = NOW(), rejection_reason = $4
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfileReview>(&query)
            .bind(id)
            .bind(REVIEW_REJECTED)
            .bind(admin_id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }
}
