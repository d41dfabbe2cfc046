use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::monthly_usage::MonthlyUsage,
    use_cases::quota::{CounterKind, MonthlyUsageRepo, UsageDelta},
};

fn counter_column(kind: CounterKind) -> &'static str {
    match kind {
        CounterKind::Idea => "ideas_used",
        CounterKind::Caption => "captions_used",
    }
}

#[async_trait]
impl MonthlyUsageRepo for PostgresPersistence {
    async fn find(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<Option<MonthlyUsage>> {
        let usage = sqlx::query_as::<_, MonthlyUsage>(
            r#"SELECT id, user_id, year, month, ideas_used, captions_used
               FROM monthly_usage
               WHERE user_id = $1 AND year = $2 AND month = $3"#,
        )
        .bind(user_id)
        .bind(year)
        .bind(month)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(usage)
    }

    async fn increment(
        &self,
        user_id: Uuid,
        year: i32,
        month: i32,
        kind: CounterKind,
        amount: i32,
    ) -> AppResult<UsageDelta> {
        let col = counter_column(kind);
        // Upsert-and-add in one statement; the row lock makes concurrent
        // increments serialize instead of losing updates.
        let current: i32 = sqlx::query_scalar(&format!(
            r#"INSERT INTO monthly_usage (id, user_id, year, month, {col})
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (user_id, year, month)
               DO UPDATE SET {col} = monthly_usage.{col} + $5
               RETURNING {col}"#,
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(year)
        .bind(month)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(UsageDelta {
            previous: current - amount,
            current,
        })
    }
}
