//! Repository for the `brands` and `brand_niches` tables.

use influx_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::brand::{Brand, CreateBrand, UpdateBrand};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, brand_name, username, email, phone, password_hash, \
                       legal_entity_name, company_address, company_website, brand_bio, \
                       profile_image_url, poc_name, poc_designation, poc_email, \
                       poc_contact_number, is_email_verified, is_profile_completed, \
                       is_verified, is_active, failed_login_count, locked_until, \
                       device_token, last_login_at, created_at, updated_at";

/// Provides CRUD operations for brands.
pub struct BrandRepo;

impl BrandRepo {
    /// Insert a new brand, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBrand) -> Result<Brand, sqlx::Error> {
        let query = format!(
            "INSERT INTO brands (brand_name, username, email, phone, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(&input.brand_name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find an active brand by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE id = $1 AND is_active = true");
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active brand by normalized email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE email = $1 AND is_active = true");
        sqlx::query_as::<_, Brand>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether any brand row (active or not) holds this username.
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM brands WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBrand,
    ) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!(
            "UPDATE brands SET
                brand_name = COALESCE($2, brand_name),
                phone = COALESCE($3, phone),
                legal_entity_name = COALESCE($4, legal_entity_name),
                company_address = COALESCE($5, company_address),
                company_website = COALESCE($6, company_website),
                brand_bio = COALESCE($7, brand_bio),
                poc_name = COALESCE($8, poc_name),
                poc_designation = COALESCE($9, poc_designation),
                poc_email = COALESCE($10, poc_email),
                poc_contact_number = COALESCE($11, poc_contact_number)
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .bind(&input.brand_name)
            .bind(&input.phone)
            .bind(&input.legal_entity_name)
            .bind(&input.company_address)
            .bind(&input.company_website)
            .bind(&input.brand_bio)
            .bind(&input.poc_name)
            .bind(&input.poc_designation)
            .bind(&input.poc_email)
            .bind(&input.poc_contact_number)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_logo(
        pool: &PgPool,
        id: DbId,
        url: &str,
    ) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!(
            "UPDATE brands SET profile_image_url = $2
             WHERE id = $1 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .bind(url)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_email_verified(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE brands SET is_email_verified = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_profile_completed(
        pool: &PgPool,
        id: DbId,
        completed: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE brands SET is_profile_completed = $2 WHERE id = $1")
            .bind(id)
            .bind(completed)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_verified(pool: &PgPool, id: DbId, verified: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE brands SET is_verified = $2 WHERE id = $1")
            .bind(id)
            .bind(verified)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_device_token(
        pool: &PgPool,
        id: DbId,
        token: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE brands SET device_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Count one failed login and return the new total.
    ///
    /// A lock that has already expired is cleared and the count restarts at 1.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE brands SET
                failed_login_count = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= NOW() THEN 1
                    ELSE failed_login_count + 1
                END,
                locked_until = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= NOW() THEN NULL
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Lock a brand account until the specified timestamp and restart the
    /// failure count.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE brands SET locked_until = $2, failed_login_count = 0 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset the failure counter, clear the lock
    /// and set `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE brands SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the password hash and clear any lockout.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE brands SET password_hash = $2, failed_login_count = 0, locked_until = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Niche associations
    // -----------------------------------------------------------------------

    pub async fn niche_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT niche_id FROM brand_niches WHERE brand_id = $1 ORDER BY niche_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(n,)| n).collect())
    }

    /// Replace all niche associations for a brand.
    pub async fn set_niches(
        pool: &PgPool,
        id: DbId,
        niche_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM brand_niches WHERE brand_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO brand_niches (brand_id, niche_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(niche_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
