use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use serde::Serialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        email_templates::{limit_reached_email, weekly_summary_email},
        ports::{clock::Clock, notifications::NotificationSender},
    },
    domain::entities::{
        monthly_usage::MonthlyUsage,
        plan::{Plan, FREE_PLAN_SLUG},
        subscription::Subscription,
    },
};

/// The five gated actions. Idea and caption generation burn a monthly
/// counter; the rest are checked against a live count of stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    Idea,
    Caption,
    Draft,
    MediaUpload,
    Reminder,
}

impl QuotaKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "idea" => Some(Self::Idea),
            "caption" => Some(Self::Caption),
            "draft" => Some(Self::Draft),
            "media_upload" => Some(Self::MediaUpload),
            "reminder" => Some(Self::Reminder),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Caption => "caption",
            Self::Draft => "draft",
            Self::MediaUpload => "media_upload",
            Self::Reminder => "reminder",
        }
    }
}

/// Subset of [`QuotaKind`] that is consumed through the monthly ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Idea,
    Caption,
}

impl CounterKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Caption => "caption",
        }
    }

    pub fn used_in(&self, usage: &MonthlyUsage) -> i32 {
        match self {
            Self::Idea => usage.ideas_used,
            Self::Caption => usage.captions_used,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaCheck {
    pub kind: String,
    pub allowed: bool,
    pub used: i64,
    /// `None` means the plan places no cap on this action.
    pub limit: Option<i64>,
}

/// Counter values around an increment, read from the same atomic statement.
#[derive(Debug, Clone, Copy)]
pub struct UsageDelta {
    pub previous: i32,
    pub current: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    pub used: i64,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageOverview {
    pub plan_slug: String,
    pub plan_name: String,
    pub period_year: i32,
    pub period_month: i32,
    pub ideas: UsageEntry,
    pub captions: UsageEntry,
    pub drafts: UsageEntry,
    pub media_uploads: UsageEntry,
    pub reminders: UsageEntry,
}

/// Plan row as written by seeding or the free-plan fallback.
#[derive(Debug, Clone)]
pub struct PlanSeed {
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
}

impl PlanSeed {
    /// Minimal free plan created on demand when no plan rows exist yet.
    /// Seeding normally installs a richer free tier first.
    pub fn free_fallback() -> Self {
        Self {
            slug: FREE_PLAN_SLUG.to_string(),
            name: "Free".to_string(),
            price_usd_cents: 0,
            stripe_price_id: None,
            ideas_per_month: 20,
            captions_per_month: 20,
            drafts_limit: None,
            media_uploads_per_month: None,
            posting_reminders_per_month: None,
            max_upload_mb: 20,
            max_video_seconds: 60,
        }
    }
}

#[async_trait]
pub trait PlanRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Plan>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Plan>>;
    async fn list(&self) -> AppResult<Vec<Plan>>;
    async fn upsert_by_slug(&self, seed: &PlanSeed) -> AppResult<Plan>;
}

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    /// Most recent subscription by start date, active or not.
    async fn find_latest_for_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>>;
}

#[async_trait]
pub trait MonthlyUsageRepo: Send + Sync {
    async fn find(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<Option<MonthlyUsage>>;

    /// Adds `amount` to the counter for the given month, creating the row if
    /// missing, in one atomic statement. Returns the counter value before and
    /// after so callers can detect a limit crossing.
    async fn increment(
        &self,
        user_id: Uuid,
        year: i32,
        month: i32,
        kind: CounterKind,
        amount: i32,
    ) -> AppResult<UsageDelta>;
}

/// Live-count lookups for quota kinds that are not ledger-backed.
#[async_trait]
pub trait ResourceCountRepo: Send + Sync {
    /// Non-archived drafts, all time.
    async fn active_drafts_count(&self, user_id: Uuid) -> AppResult<i64>;
    async fn media_uploads_in_month(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<i64>;
    async fn reminders_in_month(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<i64>;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserContact {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_contact(&self, user_id: Uuid) -> AppResult<Option<UserContact>>;
    async fn list_active_contacts(&self) -> AppResult<Vec<UserContact>>;
}

#[derive(Clone)]
pub struct QuotaUseCases {
    plans: Arc<dyn PlanRepo>,
    subscriptions: Arc<dyn SubscriptionRepo>,
    usage: Arc<dyn MonthlyUsageRepo>,
    resources: Arc<dyn ResourceCountRepo>,
    users: Arc<dyn UserRepo>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    frontend_url: String,
}

impl QuotaUseCases {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plans: Arc<dyn PlanRepo>,
        subscriptions: Arc<dyn SubscriptionRepo>,
        usage: Arc<dyn MonthlyUsageRepo>,
        resources: Arc<dyn ResourceCountRepo>,
        users: Arc<dyn UserRepo>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        frontend_url: String,
    ) -> Self {
        Self {
            plans,
            subscriptions,
            usage,
            resources,
            users,
            notifier,
            clock,
            frontend_url,
        }
    }

    /// Plan backing the user's quota right now: the latest subscription's
    /// plan while that subscription is active, otherwise the free plan
    /// (created on the fly if nobody seeded it).
    pub async fn effective_plan(&self, user_id: Uuid) -> AppResult<Plan> {
        let now = self.clock.now_utc();
        if let Some(sub) = self.subscriptions.find_latest_for_user(user_id).await? {
            if sub.is_active_at(now) {
                if let Some(plan_id) = sub.plan_id {
                    if let Some(plan) = self.plans.find_by_id(plan_id).await? {
                        return Ok(plan);
                    }
                    warn!(%user_id, %plan_id, "active subscription references missing plan, using free plan");
                }
            }
        }
        self.get_or_create_free_plan().await
    }

    pub async fn get_or_create_free_plan(&self) -> AppResult<Plan> {
        if let Some(plan) = self.plans.find_by_slug(FREE_PLAN_SLUG).await? {
            return Ok(plan);
        }
        self.plans.upsert_by_slug(&PlanSeed::free_fallback()).await
    }

    /// Whether the user may consume `amount` more units of `kind` right now.
    /// `allowed` holds iff the consumption would still fit under the plan
    /// limit, so batch callers pass their whole batch size here.
    #[instrument(skip(self))]
    pub async fn check_usage_allowed(
        &self,
        user_id: Uuid,
        kind: QuotaKind,
        amount: i32,
    ) -> AppResult<QuotaCheck> {
        if amount <= 0 {
            return Err(AppError::InvalidInput(
                "usage amount must be positive".to_string(),
            ));
        }

        let now = self.clock.now_utc();
        let (year, month) = (now.year(), now.month() as i32);
        let plan = self.effective_plan(user_id).await?;

        let check = match kind {
            QuotaKind::Idea | QuotaKind::Caption => {
                let counter = match kind {
                    QuotaKind::Idea => CounterKind::Idea,
                    _ => CounterKind::Caption,
                };
                let limit = match counter {
                    CounterKind::Idea => plan.ideas_per_month,
                    CounterKind::Caption => plan.captions_per_month,
                };
                let used = self
                    .usage
                    .find(user_id, year, month)
                    .await?
                    .map(|u| counter.used_in(&u))
                    .unwrap_or(0) as i64;
                // A counter limit of zero means the plan grants none at all.
                QuotaCheck {
                    kind: kind.name().to_string(),
                    allowed: limit > 0 && used + amount as i64 <= limit as i64,
                    used,
                    limit: Some(limit as i64),
                }
            }
            QuotaKind::Draft => {
                let used = self.resources.active_drafts_count(user_id).await?;
                Self::live_count_check(kind, used, amount, plan.drafts_limit)
            }
            QuotaKind::MediaUpload => {
                let used = self.resources.media_uploads_in_month(user_id, year, month).await?;
                Self::live_count_check(kind, used, amount, plan.media_uploads_per_month)
            }
            QuotaKind::Reminder => {
                let used = self.resources.reminders_in_month(user_id, year, month).await?;
                Self::live_count_check(kind, used, amount, plan.posting_reminders_per_month)
            }
        };
        Ok(check)
    }

    // Live-count kinds treat a missing or zero limit as unlimited.
    fn live_count_check(kind: QuotaKind, used: i64, amount: i32, limit: Option<i32>) -> QuotaCheck {
        let limit = limit.filter(|l| *l > 0).map(|l| l as i64);
        QuotaCheck {
            kind: kind.name().to_string(),
            allowed: limit.map(|l| used + amount as i64 <= l).unwrap_or(true),
            used,
            limit,
        }
    }

    /// String-keyed entry point for callers that carry the kind as data.
    /// An unrecognized kind is allowed through with a warning rather than
    /// blocking a user action over a naming drift.
    pub async fn check_usage_allowed_by_name(
        &self,
        user_id: Uuid,
        kind_name: &str,
        amount: i32,
    ) -> AppResult<QuotaCheck> {
        match QuotaKind::from_name(kind_name) {
            Some(kind) => self.check_usage_allowed(user_id, kind, amount).await,
            None => {
                warn!(%user_id, kind = kind_name, "unknown quota kind, allowing");
                Ok(QuotaCheck {
                    kind: kind_name.to_string(),
                    allowed: true,
                    used: 0,
                    limit: None,
                })
            }
        }
    }

    /// Records consumption of a counter-backed kind. When this increment is
    /// the one that crosses the plan limit, a limit-reached email goes out in
    /// the background; delivery failures never fail the increment.
    #[instrument(skip(self))]
    pub async fn increment_usage(
        &self,
        user_id: Uuid,
        kind: CounterKind,
        amount: i32,
    ) -> AppResult<UsageDelta> {
        if amount <= 0 {
            return Err(AppError::InvalidInput(
                "usage amount must be positive".to_string(),
            ));
        }

        let now = self.clock.now_utc();
        let (year, month) = (now.year(), now.month() as i32);
        let delta = self.usage.increment(user_id, year, month, kind, amount).await?;

        let plan = self.effective_plan(user_id).await?;
        let limit = match kind {
            CounterKind::Idea => plan.ideas_per_month,
            CounterKind::Caption => plan.captions_per_month,
        };
        if limit > 0 && delta.current >= limit && delta.previous < limit {
            self.spawn_limit_reached_email(user_id, kind);
        }

        Ok(delta)
    }

    fn spawn_limit_reached_email(&self, user_id: Uuid, kind: CounterKind) {
        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);
        let frontend_url = self.frontend_url.clone();
        tokio::spawn(async move {
            let contact = match users.find_contact(user_id).await {
                Ok(Some(contact)) => contact,
                Ok(None) => {
                    warn!(%user_id, "limit reached but user has no contact email");
                    return;
                }
                Err(e) => {
                    warn!(%user_id, error = %e, "failed to load user for limit email");
                    return;
                }
            };
            let (subject, html) = limit_reached_email(&frontend_url, kind.label());
            if let Err(e) = notifier.send(&contact.email, &subject, &html).await {
                warn!(%user_id, error = %e, "failed to send limit reached email");
            }
        });
    }

    /// Snapshot of all five quota kinds for the current month.
    #[instrument(skip(self))]
    pub async fn usage_overview(&self, user_id: Uuid) -> AppResult<UsageOverview> {
        let now = self.clock.now_utc();
        let (year, month) = (now.year(), now.month() as i32);
        let plan = self.effective_plan(user_id).await?;

        let usage = self.usage.find(user_id, year, month).await?;
        let (ideas_used, captions_used) = usage
            .map(|u| (u.ideas_used as i64, u.captions_used as i64))
            .unwrap_or((0, 0));
        let drafts_used = self.resources.active_drafts_count(user_id).await?;
        let uploads_used = self.resources.media_uploads_in_month(user_id, year, month).await?;
        let reminders_used = self.resources.reminders_in_month(user_id, year, month).await?;

        let live_limit = |l: Option<i32>| l.filter(|v| *v > 0).map(|v| v as i64);

        Ok(UsageOverview {
            plan_slug: plan.slug.clone(),
            plan_name: plan.name.clone(),
            period_year: year,
            period_month: month,
            ideas: UsageEntry {
                used: ideas_used,
                limit: Some(plan.ideas_per_month as i64),
            },
            captions: UsageEntry {
                used: captions_used,
                limit: Some(plan.captions_per_month as i64),
            },
            drafts: UsageEntry {
                used: drafts_used,
                limit: live_limit(plan.drafts_limit),
            },
            media_uploads: UsageEntry {
                used: uploads_used,
                limit: live_limit(plan.media_uploads_per_month),
            },
            reminders: UsageEntry {
                used: reminders_used,
                limit: live_limit(plan.posting_reminders_per_month),
            },
        })
    }

    pub async fn list_plans(&self) -> AppResult<Vec<Plan>> {
        self.plans.list().await
    }

    /// Emails every active user a recap of this month's output. Returns the
    /// number of summaries delivered; per-user failures are logged and skipped.
    #[instrument(skip(self))]
    pub async fn send_weekly_summaries(&self) -> AppResult<u64> {
        let now = self.clock.now_utc();
        let (year, month) = (now.year(), now.month() as i32);
        let mut sent = 0u64;

        for contact in self.users.list_active_contacts().await? {
            let usage = match self.usage.find(contact.id, year, month).await {
                Ok(u) => u,
                Err(e) => {
                    warn!(user_id = %contact.id, error = %e, "skipping weekly summary, usage lookup failed");
                    continue;
                }
            };
            let (ideas_used, captions_used) = usage
                .map(|u| (u.ideas_used, u.captions_used))
                .unwrap_or((0, 0));
            let drafts = match self.resources.active_drafts_count(contact.id).await {
                Ok(n) => n,
                Err(e) => {
                    warn!(user_id = %contact.id, error = %e, "skipping weekly summary, draft count failed");
                    continue;
                }
            };

            let (subject, html) = weekly_summary_email(
                &self.frontend_url,
                &contact.username,
                ideas_used,
                captions_used,
                drafts,
            );
            match self.notifier.send(&contact.email, &subject, &html).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!(user_id = %contact.id, error = %e, "failed to send weekly summary");
                }
            }
        }

        Ok(sent)
    }
}
