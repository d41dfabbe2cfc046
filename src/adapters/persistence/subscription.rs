use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::subscription::Subscription,
    use_cases::quota::SubscriptionRepo,
};

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn find_latest_for_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        let sub = sqlx::query_as::<_, Subscription>(
            r#"SELECT id, user_id, plan_id, stripe_customer_id, stripe_subscription_id,
                      start_date, end_date
               FROM subscriptions
               WHERE user_id = $1
               ORDER BY start_date DESC
               LIMIT 1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(sub)
    }
}
