use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::planned_slot::PlannedPostSlot,
    use_cases::reminders::{NewPlannedSlot, PlannedSlotRepo},
};

const SELECT_COLS: &str =
    "id, user_id, platform, scheduled_at, title, notify, reminded_at, created_at";

#[async_trait]
impl PlannedSlotRepo for PostgresPersistence {
    async fn insert_many(&self, slots: &[NewPlannedSlot]) -> AppResult<Vec<PlannedPostSlot>> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        let mut saved = Vec::with_capacity(slots.len());
        for slot in slots {
            let row = sqlx::query_as::<_, PlannedPostSlot>(&format!(
                r#"INSERT INTO planned_post_slots (id, user_id, platform, scheduled_at, title, notify)
                   VALUES ($1, $2, $3, $4, $5, $6)
                   RETURNING {}"#,
                SELECT_COLS
            ))
            .bind(Uuid::new_v4())
            .bind(slot.user_id)
            .bind(&slot.platform)
            .bind(slot.scheduled_at)
            .bind(&slot.title)
            .bind(slot.notify)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from)?;
            saved.push(row);
        }
        tx.commit().await.map_err(AppError::from)?;
        Ok(saved)
    }

    async fn claim_due(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        reminded_at: DateTime<Utc>,
    ) -> AppResult<Vec<PlannedPostSlot>> {
        // Stamp and read in one statement so concurrent dispatchers cannot
        // claim the same slot twice.
        let claimed = sqlx::query_as::<_, PlannedPostSlot>(&format!(
            r#"UPDATE planned_post_slots
               SET reminded_at = $1
               WHERE notify = TRUE
                 AND reminded_at IS NULL
                 AND scheduled_at >= $2
                 AND scheduled_at <= $3
               RETURNING {}"#,
            SELECT_COLS
        ))
        .bind(reminded_at)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(claimed)
    }
}
