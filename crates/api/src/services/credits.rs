//! Weekly credit and Pro membership lookups.

use influx_core::credits::{effective_balance, CreditBalance};
use influx_core::types::{DbId, Timestamp};
use influx_db::models::influencer::Influencer;
use influx_db::repositories::{InfluencerRepo, ProSubscriptionRepo};

/// Resolve the influencer's balance, persisting a weekly reset if one is due.
pub async fn current_balance(
    pool: &sqlx::PgPool,
    influencer: &Influencer,
    now: Timestamp,
) -> Result<CreditBalance, sqlx::Error> {
    let balance = effective_balance(
        influencer.weekly_credits,
        influencer.weekly_credits_reset_at,
        now,
    );
    if balance.was_reset {
        InfluencerRepo::save_credits(pool, influencer.id, balance.credits, balance.resets_at)
            .await?;
        tracing::debug!(influencer_id = influencer.id, "Weekly credits reset");
    }
    Ok(balance)
}

pub async fn is_pro(
    pool: &sqlx::PgPool,
    influencer_id: DbId,
    now: Timestamp,
) -> Result<bool, sqlx::Error> {
    Ok(ProSubscriptionRepo::find_current(pool, influencer_id, now)
        .await?
        .is_some())
}
