use serde::Serialize;
use uuid::Uuid;

/// Creator settings the planner reads: timezone, platform preferences and
/// the self-described stage/goal that drives the weekly-posts heuristic.
///
/// Platforms are free-form strings on purpose; unknown platforms degrade to
/// generic posting hours rather than erroring.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorProfile {
    pub user_id: Uuid,
    pub timezone: String,
    pub default_platform: String,
    pub preferred_platforms: Vec<String>,
    pub creator_stage: String,
    pub goal: Option<String>,
}

impl CreatorProfile {
    /// Profile used when the user never completed onboarding.
    pub fn default_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            timezone: "UTC".to_string(),
            default_platform: "instagram".to_string(),
            preferred_platforms: Vec::new(),
            creator_stage: "starter".to_string(),
            goal: None,
        }
    }
}
