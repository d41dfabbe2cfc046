use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A scheduled future moment for the user to post on a platform.
///
/// `reminded_at` is the one-shot flag: a reminder fires at most once, and
/// only dispatch may set it (via a conditional claim, so concurrent runs
/// cannot double-fire).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlannedPostSlot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: String,
    pub scheduled_at: DateTime<Utc>,
    pub title: String,
    pub notify: bool,
    pub reminded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
