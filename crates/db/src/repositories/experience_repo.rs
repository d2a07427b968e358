//! Repository for the `experiences` table.

use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::experience::{CreateExperience, Experience, UpdateExperience};

const COLUMNS: &str = "id, influencer_id, campaign_name, brand_name, niche_id, description, \
                       link, started_on, ended_on, created_at, updated_at";

pub struct ExperienceRepo;

impl ExperienceRepo {
    pub async fn create(
        pool: &PgPool,
        influencer_id: DbId,
        input: &CreateExperience,
    ) -> Result<Experience, sqlx::Error> {
        let query = format!(
            "INSERT INTO experiences
                (influencer_id, campaign_name, brand_name, niche_id, description, link,
                 started_on, ended_on)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(influencer_id)
            .bind(&input.campaign_name)
            .bind(&input.brand_name)
            .bind(input.niche_id)
            .bind(&input.description)
            .bind(&input.link)
            .bind(input.started_on)
            .bind(input.ended_on)
            .fetch_one(pool)
            .await
    }

    /// Active experiences for an influencer, most recent first.
    pub async fn list_for_influencer(
        pool: &PgPool,
        influencer_id: DbId,
    ) -> Result<Vec<Experience>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM experiences
             WHERE influencer_id = $1 AND is_active = true
             ORDER BY started_on DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(influencer_id)
            .fetch_all(pool)
            .await
    }

    /// Update an experience owned by `influencer_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
        input: &UpdateExperience,
    ) -> Result<Option<Experience>, sqlx::Error> {
        let query = format!(
            "UPDATE experiences SET
                campaign_name = COALESCE($3, campaign_name),
                brand_name = COALESCE($4, brand_name),
                niche_id = COALESCE($5, niche_id),
                description = COALESCE($6, description),
                link = COALESCE($7, link),
                started_on = COALESCE($8, started_on),
                ended_on = COALESCE($9, ended_on)
             WHERE id = $1 AND influencer_id = $2 AND is_active = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(id)
            .bind(influencer_id)
            .bind(&input.campaign_name)
            .bind(&input.brand_name)
            .bind(input.niche_id)
            .bind(&input.description)
            .bind(&input.link)
            .bind(input.started_on)
            .bind(input.ended_on)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an experience owned by `influencer_id`.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE experiences SET is_active = false
             WHERE id = $1 AND influencer_id = $2 AND is_active = true",
        )
        .bind(id)
        .bind(influencer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
