use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    use_cases::quota::ResourceCountRepo,
};

#[async_trait]
impl ResourceCountRepo for PostgresPersistence {
    async fn active_drafts_count(&self, user_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM drafts WHERE user_id = $1 AND archived = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(count)
    }

    async fn media_uploads_in_month(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM media_uploads
               WHERE user_id = $1
                 AND EXTRACT(YEAR FROM created_at)::int = $2
                 AND EXTRACT(MONTH FROM created_at)::int = $3"#,
        )
        .bind(user_id)
        .bind(year)
        .bind(month)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(count)
    }

    async fn reminders_in_month(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM planned_post_slots
               WHERE user_id = $1
                 AND notify = TRUE
                 AND EXTRACT(YEAR FROM created_at)::int = $2
                 AND EXTRACT(MONTH FROM created_at)::int = $3"#,
        )
        .bind(user_id)
        .bind(year)
        .bind(month)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(count)
    }
}
