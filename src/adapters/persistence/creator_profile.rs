use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    adapters::persistence::{parse_json_with_fallback, PostgresPersistence},
    app_error::{AppError, AppResult},
    domain::entities::creator_profile::CreatorProfile,
    use_cases::scheduling::CreatorProfileRepo,
};

#[derive(FromRow)]
struct DbCreatorProfile {
    user_id: Uuid,
    timezone: String,
    default_platform: String,
    preferred_platforms: serde_json::Value,
    creator_stage: String,
    goal: Option<String>,
}

fn to_profile(db: DbCreatorProfile) -> CreatorProfile {
    let preferred_platforms = parse_json_with_fallback(
        &db.preferred_platforms,
        "preferred_platforms",
        "creator_profile",
        &db.user_id.to_string(),
    );
    CreatorProfile {
        user_id: db.user_id,
        timezone: db.timezone,
        default_platform: db.default_platform,
        preferred_platforms,
        creator_stage: db.creator_stage,
        goal: db.goal,
    }
}

#[async_trait]
impl CreatorProfileRepo for PostgresPersistence {
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Option<CreatorProfile>> {
        let row = sqlx::query_as::<_, DbCreatorProfile>(
            r#"SELECT user_id, timezone, default_platform, preferred_platforms,
                      creator_stage, goal
               FROM creator_profiles
               WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(to_profile))
    }
}
