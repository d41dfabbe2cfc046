use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A pricing tier. Seeded at deploy time and referenced (never owned) by
/// subscriptions.
///
/// Limit semantics differ by field group:
/// - `ideas_per_month` / `captions_per_month` are hard monthly quotas; a
///   value of 0 blocks the action entirely.
/// - `drafts_limit`, `media_uploads_per_month` and
///   `posting_reminders_per_month` are row-counted caps where `None` or 0
///   means unlimited.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub price_usd_cents: i32,
    pub stripe_price_id: Option<String>,
    pub ideas_per_month: i32,
    pub captions_per_month: i32,
    pub drafts_limit: Option<i32>,
    pub media_uploads_per_month: Option<i32>,
    pub posting_reminders_per_month: Option<i32>,
    pub max_upload_mb: i32,
    pub max_video_seconds: i32,
    pub created_at: Option<NaiveDateTime>,
}

pub const FREE_PLAN_SLUG: &str = "free";
