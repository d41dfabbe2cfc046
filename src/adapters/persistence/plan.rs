use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::plan::Plan,
    use_cases::quota::{PlanRepo, PlanSeed},
};

const SELECT_COLS: &str = r#"
    id, slug, name, price_usd_cents, stripe_price_id,
    ideas_per_month, captions_per_month, drafts_limit,
    media_uploads_per_month, posting_reminders_per_month,
    max_upload_mb, max_video_seconds, created_at
"#;

#[async_trait]
impl PlanRepo for PostgresPersistence {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {} FROM plans WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(plan)
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {} FROM plans WHERE slug = $1",
            SELECT_COLS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(plan)
    }

    async fn list(&self) -> AppResult<Vec<Plan>> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {} FROM plans ORDER BY price_usd_cents ASC",
            SELECT_COLS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(plans)
    }

    async fn upsert_by_slug(&self, seed: &PlanSeed) -> AppResult<Plan> {
        let plan = sqlx::query_as::<_, Plan>(&format!(
            r#"INSERT INTO plans (
                   id, slug, name, price_usd_cents, stripe_price_id,
                   ideas_per_month, captions_per_month, drafts_limit,
                   media_uploads_per_month, posting_reminders_per_month,
                   max_upload_mb, max_video_seconds
               )
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               ON CONFLICT (slug)
               DO UPDATE SET
                    name = EXCLUDED.name,
                    price_usd_cents = EXCLUDED.price_usd_cents,
                    stripe_price_id = EXCLUDED.stripe_price_id,
                    ideas_per_month = EXCLUDED.ideas_per_month,
                    captions_per_month = EXCLUDED.captions_per_month,
                    drafts_limit = EXCLUDED.drafts_limit,
                    media_uploads_per_month = EXCLUDED.media_uploads_per_month,
                    posting_reminders_per_month = EXCLUDED.posting_reminders_per_month,
                    max_upload_mb = EXCLUDED.max_upload_mb,
                    max_video_seconds = EXCLUDED.max_video_seconds
               RETURNING {}"#,
            SELECT_COLS
        ))
        .bind(Uuid::new_v4())
        .bind(&seed.slug)
        .bind(&seed.name)
        .bind(seed.price_usd_cents)
        .bind(&seed.stripe_price_id)
        .bind(seed.ideas_per_month)
        .bind(seed.captions_per_month)
        .bind(seed.drafts_limit)
        .bind(seed.media_uploads_per_month)
        .bind(seed.posting_reminders_per_month)
        .bind(seed.max_upload_mb)
        .bind(seed.max_video_seconds)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(plan)
    }
}
