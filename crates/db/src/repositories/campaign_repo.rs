//! Repository for the `campaigns`, `campaign_niches` and `campaign_cities` tables.

use influx_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign, DiscoveryFilter, UpdateCampaign};

/// Column list for `campaigns c JOIN brands b`, with association ids folded in.
const COLUMNS: &str = "c.id, c.brand_id, b.brand_name, c.name, c.description, c.deliverables, \
    c.campaign_type, c.budget_per_influencer, c.status, c.is_open_to_all_ages, \
    c.min_age, c.max_age, c.is_open_to_all_genders, c.genders, c.is_pan_india, \
    c.is_invite_only, c.application_deadline, c.published_at, c.is_active, \
    ARRAY(SELECT cn.niche_id FROM campaign_niches cn \
          WHERE cn.campaign_id = c.id ORDER BY cn.niche_id) AS niche_ids, \
    ARRAY(SELECT cc.city_id FROM campaign_cities cc \
          WHERE cc.campaign_id = c.id ORDER BY cc.city_id) AS city_ids, \
    c.created_at, c.updated_at";

const FROM: &str = "campaigns c JOIN brands b ON b.id = c.brand_id";

/// Targeting predicates for discovery. Binds: $1 influencer id, $2 niche ids,
/// $3 age, $4 gender, $5 city id, $6 is_pro, $7 early-access cutoff.
///
/// An invitation short-circuits every other rule. A NULL influencer attribute
/// fails the matching restriction.
const ELIGIBILITY: &str = "(\
    EXISTS (SELECT 1 FROM campaign_invitations ci \
            WHERE ci.campaign_id = c.id AND ci.influencer_id = $1 \
                  AND ci.status <> 'declined') \
    OR (\
        c.is_invite_only = false \
        AND ($6 OR c.published_at <= $7) \
        AND (NOT EXISTS (SELECT 1 FROM campaign_niches cn WHERE cn.campaign_id = c.id) \
             OR EXISTS (SELECT 1 FROM campaign_niches cn \
                        WHERE cn.campaign_id = c.id AND cn.niche_id = ANY($2))) \
        AND (c.is_open_to_all_ages \
             OR (COALESCE(c.min_age, 0) <= $3 AND $3 <= COALESCE(c.max_age, 1000))) \
        AND (c.is_open_to_all_genders OR $4 = ANY(c.genders)) \
        AND (c.is_pan_india \
             OR EXISTS (SELECT 1 FROM campaign_cities cc \
                        WHERE cc.campaign_id = c.id AND cc.city_id = $5))\
    ))";

/// Provides CRUD and discovery queries for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a draft campaign with its niche and city associations.
    pub async fn create(
        pool: &PgPool,
        brand_id: DbId,
        input: &CreateCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO campaigns
                (brand_id, name, description, deliverables, campaign_type,
                 budget_per_influencer, is_open_to_all_ages, min_age, max_age,
                 is_open_to_all_genders, genders, is_pan_india, is_invite_only,
                 application_deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING id",
        )
        .bind(brand_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.deliverables)
        .bind(&input.campaign_type)
        .bind(input.budget_per_influencer)
        .bind(input.is_open_to_all_ages)
        .bind(input.min_age)
        .bind(input.max_age)
        .bind(input.is_open_to_all_genders)
        .bind(&input.genders)
        .bind(input.is_pan_india)
        .bind(input.is_invite_only)
        .bind(input.application_deadline)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_niches_inner(&mut tx, id, &input.niche_ids).await?;
        Self::set_cities_inner(&mut tx, id, &input.city_ids).await?;

        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE c.id = $1");
        let campaign = sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(campaign)
    }

    /// Find a non-deleted campaign by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE c.id = $1 AND c.is_active = true");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a brand's campaigns, newest first, optionally filtered by status.
    pub async fn list_by_brand(
        pool: &PgPool,
        brand_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             WHERE c.brand_id = $1 AND c.is_active = true
               AND ($2::TEXT IS NULL OR c.status = $2)
             ORDER BY c.created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(brand_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a campaign. Only non-`None` fields are applied; `Some` id lists
    /// replace the association sets.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE campaigns SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                deliverables = COALESCE($4, deliverables),
                budget_per_influencer = COALESCE($5, budget_per_influencer),
                is_open_to_all_ages = COALESCE($6, is_open_to_all_ages),
                min_age = COALESCE($7, min_age),
                max_age = COALESCE($8, max_age),
                is_open_to_all_genders = COALESCE($9, is_open_to_all_genders),
                genders = COALESCE($10, genders),
                is_pan_india = COALESCE($11, is_pan_india),
                is_invite_only = COALESCE($12, is_invite_only),
                application_deadline = COALESCE($13, application_deadline)
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.deliverables)
        .bind(input.budget_per_influencer)
        .bind(input.is_open_to_all_ages)
        .bind(input.min_age)
        .bind(input.max_age)
        .bind(input.is_open_to_all_genders)
        .bind(&input.genders)
        .bind(input.is_pan_india)
        .bind(input.is_invite_only)
        .bind(input.application_deadline)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(ref niche_ids) = input.niche_ids {
            Self::set_niches_inner(&mut tx, id, niche_ids).await?;
        }
        if let Some(ref city_ids) = input.city_ids {
            Self::set_cities_inner(&mut tx, id, city_ids).await?;
        }

        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE c.id = $1");
        let campaign = sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(campaign))
    }

    /// Move a campaign from `from` to `to`. The first activation stamps
    /// `published_at`, which anchors the early-access window.
    ///
    /// Returns `false` if the campaign was not in `from` (concurrent change).
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET
                status = $3,
                published_at = CASE
                    WHEN $3 = 'active' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END
             WHERE id = $1 AND status = $2 AND is_active = true",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a campaign. Returns `true` if the row was updated.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Live campaigns the influencer described by `filter` may apply to.
    pub async fn discover(
        pool: &PgPool,
        filter: &DiscoveryFilter,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let mut conditions = vec![
            "c.status = 'active'".to_string(),
            "c.is_active = true".to_string(),
            "(c.application_deadline IS NULL OR c.application_deadline > NOW())".to_string(),
            ELIGIBILITY.to_string(),
        ];
        let mut bind_idx = 8u32;

        if filter.search.is_some() {
            conditions.push(format!(
                "(c.name ILIKE ${bind_idx} OR c.description ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if filter.niche_filter.is_some() {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM campaign_niches fn \
                         WHERE fn.campaign_id = c.id AND fn.niche_id = ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if filter.city_filter.is_some() {
            conditions.push(format!(
                "(c.is_pan_india OR EXISTS (SELECT 1 FROM campaign_cities fc \
                         WHERE fc.campaign_id = c.id AND fc.city_id = ${bind_idx}))"
            ));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE {where_clause} \
             ORDER BY c.published_at DESC, c.id DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            where_clause = conditions.join(" AND "),
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Campaign>(&query)
            .bind(filter.influencer_id)
            .bind(&filter.niche_ids)
            .bind(filter.age)
            .bind(&filter.gender)
            .bind(filter.city_id)
            .bind(filter.is_pro)
            .bind(filter.early_access_cutoff);

        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(niche_id) = filter.niche_filter {
            q = q.bind(niche_id);
        }
        if let Some(city_id) = filter.city_filter {
            q = q.bind(city_id);
        }

        q.bind(filter.limit).bind(filter.offset).fetch_all(pool).await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn set_niches_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        campaign_id: DbId,
        niche_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM campaign_niches WHERE campaign_id = $1")
            .bind(campaign_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO campaign_niches (campaign_id, niche_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(campaign_id)
        .bind(niche_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn set_cities_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        campaign_id: DbId,
        city_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM campaign_cities WHERE campaign_id = $1")
            .bind(campaign_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO campaign_cities (campaign_id, city_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(campaign_id)
        .bind(city_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
