//! Repository for the `influencers` and `influencer_niches` tables.

use influx_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::influencer::{CreateInfluencer, Influencer, UpdateInfluencer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, username, phone, email, gender, date_of_birth, bio, \
                       profile_image_url, banner_image_url, city_id, whatsapp_number, \
                       is_whatsapp_verified, instagram_url, youtube_url, facebook_url, \
                       linkedin_url, twitter_url, collaboration_costs, referral_code, \
                       referred_by_id, weekly_credits, weekly_credits_reset_at, \
                       is_profile_completed, is_verified, is_active, device_token, \
                       last_login_at, created_at, updated_at";

/// Provides CRUD operations for influencers.
pub struct InfluencerRepo;

impl InfluencerRepo {
    /// Insert a new influencer with their niches, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInfluencer,
        niche_ids: &[DbId],
    ) -> Result<Influencer, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO influencers
                (name, username, phone, gender, date_of_birth, referral_code,
                 referred_by_id, weekly_credits, weekly_credits_reset_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let influencer = sqlx::query_as::<_, Influencer>(&query)
            .bind(&input.name)
            .bind(&input.username)
            .bind(&input.phone)
            .bind(&input.gender)
            .bind(input.date_of_birth)
            .bind(&input.referral_code)
            .bind(input.referred_by_id)
            .bind(input.weekly_credits)
            .bind(input.weekly_credits_reset_at)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_niches_inner(&mut tx, influencer.id, niche_ids).await?;

        tx.commit().await?;
        Ok(influencer)
    }

    /// Find an active influencer by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Influencer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM influencers WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Influencer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active influencer by normalized phone number.
    pub async fn find_by_phone(
        pool: &PgPool,
        phone: &str,
    ) -> Result<Option<Influencer>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM influencers WHERE phone = $1 AND is_active = true");
        sqlx::query_as::<_, Influencer>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Find an active influencer by referral code.
    pub async fn find_by_referral_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Influencer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM influencers WHERE referral_code = $1 AND is_active = true"
        );
        sqlx::query_as::<_, Influencer>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Whether any influencer row (active or not) holds this username.
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM influencers WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Whether a referral code is already taken.
    pub async fn referral_code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM influencers WHERE referral_code = $1)")
                .bind(code)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInfluencer,
    ) -> Result<Option<Influencer>, sqlx::Error> {
        let query = format!(
            "UPDATE influencers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                gender = COALESCE($4, gender),
                date_of_birth = COALESCE($5, date_of_birth),
                bio = COALESCE($6, bio),
                city_id = COALESCE($7, city_id),
                instagram_url = COALESCE($8, instagram_url),
                youtube_url = COALESCE($9, youtube_url),
                facebook_url = COALESCE($10, facebook_url),
                linkedin_url = COALESCE($11, linkedin_url),
                twitter_url = COALESCE($12, twitter_url),
                collaboration_costs = COALESCE($13, collaboration_costs)
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Influencer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.gender)
            .bind(input.date_of_birth)
            .bind(&input.bio)
            .bind(input.city_id)
            .bind(&input.instagram_url)
            .bind(&input.youtube_url)
            .bind(&input.facebook_url)
            .bind(&input.linkedin_url)
            .bind(&input.twitter_url)
            .bind(&input.collaboration_costs)
            .fetch_optional(pool)
            .await
    }

    /// Set the profile and/or banner image URLs. `None` keeps the current value.
    pub async fn set_images(
        pool: &PgPool,
        id: DbId,
        profile_image_url: Option<&str>,
        banner_image_url: Option<&str>,
    ) -> Result<Option<Influencer>, sqlx::Error> {
        let query = format!(
            "UPDATE influencers SET
                profile_image_url = COALESCE($2, profile_image_url),
                banner_image_url = COALESCE($3, banner_image_url)
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Influencer>(&query)
            .bind(id)
            .bind(profile_image_url)
            .bind(banner_image_url)
            .fetch_optional(pool)
            .await
    }

    /// Record a verified WhatsApp number.
    pub async fn set_whatsapp_verified(
        pool: &PgPool,
        id: DbId,
        whatsapp_number: &str,
    ) -> Result<Option<Influencer>, sqlx::Error> {
        let query = format!(
            "UPDATE influencers SET whatsapp_number = $2, is_whatsapp_verified = true
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Influencer>(&query)
            .bind(id)
            .bind(whatsapp_number)
            .fetch_optional(pool)
            .await
    }

    /// Store or clear the push device token.
    pub async fn set_device_token(
        pool: &PgPool,
        id: DbId,
        token: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE influencers SET device_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_profile_completed(
        pool: &PgPool,
        id: DbId,
        completed: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE influencers SET is_profile_completed = $2 WHERE id = $1")
            .bind(id)
            .bind(completed)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_verified(pool: &PgPool, id: DbId, verified: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE influencers SET is_verified = $2 WHERE id = $1")
            .bind(id)
            .bind(verified)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Persist a credit counter after a lazy weekly reset.
    pub async fn save_credits(
        pool: &PgPool,
        id: DbId,
        credits: i32,
        resets_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE influencers SET weekly_credits = $2, weekly_credits_reset_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(credits)
        .bind(resets_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE influencers SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Soft-deactivate an influencer. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE influencers SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of influencers who signed up with this influencer's code.
    pub async fn count_referred(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM influencers WHERE referred_by_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Niche associations
    // -----------------------------------------------------------------------

    pub async fn niche_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT niche_id FROM influencer_niches WHERE influencer_id = $1 ORDER BY niche_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(n,)| n).collect())
    }

    /// Replace all niche associations for an influencer.
    pub async fn set_niches(
        pool: &PgPool,
        id: DbId,
        niche_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::set_niches_inner(&mut tx, id, niche_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn set_niches_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        niche_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM influencer_niches WHERE influencer_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "INSERT INTO influencer_niches (influencer_id, niche_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(niche_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
