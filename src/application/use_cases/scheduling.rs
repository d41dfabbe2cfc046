use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::ports::clock::Clock,
    domain::entities::creator_profile::CreatorProfile,
};

pub const SUGGESTION_REASON: &str = "Recommended posting window for this platform";
const MAX_SUGGESTIONS: usize = 10;

/// Posting-time tables. Product policy lives here, not in the algorithm:
/// per-platform posting hours (local time), the weekdays worth posting on,
/// and the content-type rotation used to label planned slots.
#[derive(Debug, Clone)]
pub struct SchedulingPolicy {
    platform_hours: HashMap<String, Vec<u32>>,
    fallback_hours: Vec<u32>,
    preferred_weekdays: Vec<Weekday>,
    content_rotations: HashMap<String, Vec<String>>,
    fallback_rotation: Vec<String>,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut platform_hours = HashMap::new();
        platform_hours.insert("instagram".to_string(), vec![11, 18]);
        platform_hours.insert("onlyfans".to_string(), vec![12, 21]);
        platform_hours.insert("tiktok".to_string(), vec![13, 19]);
        platform_hours.insert("twitter".to_string(), vec![9, 15, 20]);

        let mut content_rotations = HashMap::new();
        content_rotations.insert(
            "instagram".to_string(),
            owned(&["reel", "carousel", "story"]),
        );
        content_rotations.insert(
            "onlyfans".to_string(),
            owned(&["teaser", "behind-the-scenes", "exclusive drop"]),
        );
        content_rotations.insert("tiktok".to_string(), owned(&["trend", "tutorial", "duet"]));
        content_rotations.insert("twitter".to_string(), owned(&["thread", "poll", "hot take"]));

        Self {
            platform_hours,
            fallback_hours: vec![11, 18],
            preferred_weekdays: vec![
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sun,
            ],
            content_rotations,
            fallback_rotation: owned(&["post"]),
        }
    }
}

impl SchedulingPolicy {
    fn hours_for(&self, platform: &str) -> &[u32] {
        self.platform_hours
            .get(&platform.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&self.fallback_hours)
    }

    fn rotation_for(&self, platform: &str) -> &[String] {
        self.content_rotations
            .get(&platform.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&self.fallback_rotation)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedSlot {
    pub platform: String,
    pub scheduled_at: DateTime<FixedOffset>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSlotProposal {
    pub platform: String,
    pub scheduled_at: DateTime<FixedOffset>,
    pub note: String,
}

#[async_trait]
pub trait CreatorProfileRepo: Send + Sync {
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Option<CreatorProfile>>;
}

#[derive(Clone)]
pub struct SchedulingUseCases {
    profiles: Arc<dyn CreatorProfileRepo>,
    policy: Arc<SchedulingPolicy>,
    clock: Arc<dyn Clock>,
}

impl SchedulingUseCases {
    pub fn new(
        profiles: Arc<dyn CreatorProfileRepo>,
        policy: Arc<SchedulingPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            policy,
            clock,
        }
    }

    /// Up to ten future posting windows for one platform, chronological,
    /// expressed in the requested timezone.
    #[instrument(skip(self))]
    pub fn generate_posting_suggestions(
        &self,
        platform: &str,
        timezone_name: &str,
        days_ahead: u32,
    ) -> Vec<SuggestedSlot> {
        let tz = resolve_timezone(timezone_name);
        let now = self.clock.now_utc();
        self.candidate_slots(platform, tz, now, days_ahead)
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|dt| SuggestedSlot {
                platform: platform.to_string(),
                scheduled_at: dt.fixed_offset(),
                reason: SUGGESTION_REASON.to_string(),
            })
            .collect()
    }

    /// Spreads a weekly posting target over the coming window. `platform`
    /// may be a single platform or `"all"`, which expands to the profile's
    /// preferred platforms (or its default platform if none are set).
    #[instrument(skip(self))]
    pub async fn generate_ai_posting_plan(
        &self,
        user_id: Uuid,
        platform: &str,
        posts_per_week: Option<u32>,
        days_ahead: u32,
    ) -> AppResult<Vec<PlannedSlotProposal>> {
        let profile = self
            .profiles
            .find_for_user(user_id)
            .await?
            .unwrap_or_else(|| CreatorProfile::default_for(user_id));
        Ok(self.plan_from_profile(&profile, platform, posts_per_week, days_ahead))
    }

    pub fn plan_from_profile(
        &self,
        profile: &CreatorProfile,
        platform: &str,
        posts_per_week: Option<u32>,
        days_ahead: u32,
    ) -> Vec<PlannedSlotProposal> {
        let platforms: Vec<String> = if platform.eq_ignore_ascii_case("all") {
            if profile.preferred_platforms.is_empty() {
                vec![profile.default_platform.clone()]
            } else {
                profile.preferred_platforms.clone()
            }
        } else {
            vec![platform.to_string()]
        };

        let posts_per_week =
            posts_per_week.unwrap_or_else(|| derive_posts_per_week(profile)) as usize;
        let total = (posts_per_week * days_ahead as usize).div_ceil(7);
        if total == 0 || platforms.is_empty() {
            return Vec::new();
        }
        let per_platform = total.div_ceil(platforms.len());

        let tz = resolve_timezone(&profile.timezone);
        let now = self.clock.now_utc();

        let mut out = Vec::new();
        for platform in &platforms {
            let candidates = self.candidate_slots(platform, tz, now, days_ahead);
            if candidates.is_empty() {
                continue;
            }
            let count = per_platform.min(candidates.len());
            let rotation = self.policy.rotation_for(platform);
            for (i, idx) in pick_spread_indices(candidates.len(), count).into_iter().enumerate() {
                let label = &rotation[i % rotation.len()];
                out.push(PlannedSlotProposal {
                    platform: platform.clone(),
                    scheduled_at: candidates[idx].fixed_offset(),
                    note: format!("Suggested content: {label}"),
                });
            }
        }
        out.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.platform.cmp(&b.platform))
        });
        out
    }

    // All posting windows for one platform in the next `days_ahead` days:
    // preferred weekdays only, at the platform's local posting hours,
    // strictly in the future. Chronological because days and hours both
    // walk in ascending order.
    fn candidate_slots(
        &self,
        platform: &str,
        tz: Tz,
        now: DateTime<Utc>,
        days_ahead: u32,
    ) -> Vec<DateTime<Tz>> {
        let hours = self.policy.hours_for(platform);
        let today = now.with_timezone(&tz).date_naive();

        let mut slots = Vec::new();
        for day_offset in 0..days_ahead {
            let day = today + Duration::days(day_offset as i64);
            if !self.policy.preferred_weekdays.contains(&day.weekday()) {
                continue;
            }
            for &hour in hours {
                let Some(naive) = day.and_hms_opt(hour, 0, 0) else {
                    continue;
                };
                // DST gaps make some local times nonexistent; skip those.
                if let Some(local) = tz.from_local_datetime(&naive).earliest() {
                    if local.to_utc() > now {
                        slots.push(local);
                    }
                }
            }
        }
        slots
    }
}

/// IANA name to timezone, falling back to UTC on anything unparseable.
pub fn resolve_timezone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(timezone = name, "unknown timezone, falling back to UTC");
            Tz::UTC
        }
    }
}

/// Weekly posting target from the creator's self-described stage and goal.
/// Keyword lookup, not a model: "daily"/"aggressive" beat everything, then
/// stage tiers, with 4 as the default.
pub fn derive_posts_per_week(profile: &CreatorProfile) -> u32 {
    let mut haystack = profile.creator_stage.to_lowercase();
    if let Some(goal) = &profile.goal {
        haystack.push(' ');
        haystack.push_str(&goal.to_lowercase());
    }

    if haystack.contains("daily") || haystack.contains("aggressive") {
        7
    } else if haystack.contains("pro") {
        6
    } else if haystack.contains("starter") {
        3
    } else {
        4
    }
}

/// Evenly spread `count` picks over `0..total`, endpoints included, with
/// round-half-up positioning. Adjacent duplicates collapse, so the result
/// may be shorter than `count` when the window is tight.
pub fn pick_spread_indices(total: usize, count: usize) -> Vec<usize> {
    if count == 0 || total == 0 {
        return Vec::new();
    }
    if count >= total {
        return (0..total).collect();
    }
    if count == 1 {
        return vec![total / 2];
    }

    let den = count - 1;
    let mut out: Vec<usize> = Vec::with_capacity(count);
    for i in 0..count {
        let num = i * (total - 1);
        let idx = (2 * num + den) / (2 * den);
        if out.last() != Some(&idx) {
            out.push(idx);
        }
    }
    out
}
