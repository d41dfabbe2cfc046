use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    use_cases::quota::{UserContact, UserRepo},
};

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn find_contact(&self, user_id: Uuid) -> AppResult<Option<UserContact>> {
        let contact = sqlx::query_as::<_, UserContact>(
            "SELECT id, email, username FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(contact)
    }

    async fn list_active_contacts(&self) -> AppResult<Vec<UserContact>> {
        let contacts = sqlx::query_as::<_, UserContact>(
            "SELECT id, email, username FROM users WHERE is_active = TRUE ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(contacts)
    }
}
