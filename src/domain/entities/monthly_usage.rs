use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user, per-calendar-month ledger row for counter-backed quota kinds.
///
/// Uniquely keyed on (user_id, year, month). Created lazily on first use of
/// a month, never deleted, counters never decremented. A new month gets a
/// fresh row; that is the only way a counter "resets".
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthlyUsage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub ideas_used: i32,
    pub captions_used: i32,
}
