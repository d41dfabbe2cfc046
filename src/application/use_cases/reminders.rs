use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        email_templates::posting_reminder_email,
        ports::{clock::Clock, notifications::NotificationSender},
    },
    domain::entities::planned_slot::PlannedPostSlot,
    use_cases::{
        quota::{QuotaKind, QuotaUseCases, UserRepo},
        scheduling::SchedulingUseCases,
    },
};

/// Reminder emails go out for slots due within this many minutes of the
/// dispatch tick, either side.
const DUE_WINDOW_MINUTES: i64 = 2;

#[derive(Debug, Clone)]
pub struct NewPlannedSlot {
    pub user_id: Uuid,
    pub platform: String,
    pub scheduled_at: DateTime<Utc>,
    pub title: String,
    pub notify: bool,
}

#[async_trait]
pub trait PlannedSlotRepo: Send + Sync {
    async fn insert_many(&self, slots: &[NewPlannedSlot]) -> AppResult<Vec<PlannedPostSlot>>;

    /// Marks every due unreminded slot with `reminded_at` and returns the
    /// claimed rows. Claiming and reading happen in one statement so two
    /// dispatchers never pick up the same slot.
    async fn claim_due(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        reminded_at: DateTime<Utc>,
    ) -> AppResult<Vec<PlannedPostSlot>>;
}

#[derive(Clone)]
pub struct ReminderUseCases {
    slots: Arc<dyn PlannedSlotRepo>,
    users: Arc<dyn UserRepo>,
    quota: Arc<QuotaUseCases>,
    scheduling: Arc<SchedulingUseCases>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    frontend_url: String,
}

impl ReminderUseCases {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        slots: Arc<dyn PlannedSlotRepo>,
        users: Arc<dyn UserRepo>,
        quota: Arc<QuotaUseCases>,
        scheduling: Arc<SchedulingUseCases>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        frontend_url: String,
    ) -> Self {
        Self {
            slots,
            users,
            quota,
            scheduling,
            notifier,
            clock,
            frontend_url,
        }
    }

    /// Generates a posting plan and persists it as planned slots. The whole
    /// batch is gated on the reminder quota before any slot is written, so a
    /// plan that would carry the user past the cap saves nothing.
    #[instrument(skip(self))]
    pub async fn plan_and_save(
        &self,
        user_id: Uuid,
        platform: &str,
        posts_per_week: Option<u32>,
        days_ahead: u32,
        notify: bool,
    ) -> AppResult<Vec<PlannedPostSlot>> {
        let proposals = self
            .scheduling
            .generate_ai_posting_plan(user_id, platform, posts_per_week, days_ahead)
            .await?;
        if proposals.is_empty() {
            return Ok(Vec::new());
        }

        let check = self
            .quota
            .check_usage_allowed(user_id, QuotaKind::Reminder, proposals.len() as i32)
            .await?;
        if !check.allowed {
            return Err(AppError::QuotaExceeded(
                "posting reminder limit reached for this month".to_string(),
            ));
        }

        let new_slots: Vec<NewPlannedSlot> = proposals
            .into_iter()
            .map(|p| NewPlannedSlot {
                user_id,
                platform: p.platform,
                scheduled_at: p.scheduled_at.to_utc(),
                title: p.note,
                notify,
            })
            .collect();
        self.slots.insert_many(&new_slots).await
    }

    /// One dispatch tick: claim everything due around now and email the
    /// owners. A slot is reminded at most once; a failed send is logged and
    /// the slot stays claimed rather than being retried forever.
    #[instrument(skip(self))]
    pub async fn dispatch_due_reminders(&self) -> AppResult<u64> {
        let now = self.clock.now_utc();
        let window = Duration::minutes(DUE_WINDOW_MINUTES);
        let due = self.slots.claim_due(now - window, now + window, now).await?;

        let mut sent = 0u64;
        for slot in due {
            let contact = match self.users.find_contact(slot.user_id).await {
                Ok(Some(contact)) => contact,
                Ok(None) => {
                    warn!(slot_id = %slot.id, user_id = %slot.user_id, "due slot owner has no contact email");
                    continue;
                }
                Err(e) => {
                    warn!(slot_id = %slot.id, error = %e, "failed to load slot owner");
                    continue;
                }
            };
            let (subject, html) = posting_reminder_email(
                &self.frontend_url,
                &slot.platform,
                slot.scheduled_at,
                &slot.title,
            );
            match self.notifier.send(&contact.email, &subject, &html).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!(slot_id = %slot.id, error = %e, "failed to send posting reminder");
                }
            }
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{
            factories::{creator_profile_factory, plan_factory, user_contact_factory},
            mocks::{
                FixedClock, InMemoryCreatorProfileRepo, InMemoryMonthlyUsageRepo,
                InMemoryPlanRepo, InMemoryPlannedSlotRepo, InMemoryResourceCountRepo,
                InMemorySubscriptionRepo, InMemoryUserRepo, RecordingNotifier,
            },
        },
        use_cases::scheduling::SchedulingPolicy,
    };
    use chrono::TimeZone;

    struct Harness {
        reminders: ReminderUseCases,
        slots: Arc<InMemoryPlannedSlotRepo>,
        plans: Arc<InMemoryPlanRepo>,
        resources: Arc<InMemoryResourceCountRepo>,
        profiles: Arc<InMemoryCreatorProfileRepo>,
        users: Arc<InMemoryUserRepo>,
        notifier: Arc<RecordingNotifier>,
        now: DateTime<Utc>,
    }

    fn harness() -> Harness {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let clock: Arc<FixedClock> = Arc::new(FixedClock(now));
        let slots = Arc::new(InMemoryPlannedSlotRepo::default());
        let plans = Arc::new(InMemoryPlanRepo::default());
        let subscriptions = Arc::new(InMemorySubscriptionRepo::default());
        let usage = Arc::new(InMemoryMonthlyUsageRepo::default());
        let resources = Arc::new(InMemoryResourceCountRepo::default());
        let profiles = Arc::new(InMemoryCreatorProfileRepo::default());
        let users = Arc::new(InMemoryUserRepo::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let frontend = "https://app.example.com".to_string();

        let quota = Arc::new(QuotaUseCases::new(
            plans.clone(),
            subscriptions.clone(),
            usage.clone(),
            resources.clone(),
            users.clone(),
            notifier.clone(),
            clock.clone(),
            frontend.clone(),
        ));
        let scheduling = Arc::new(SchedulingUseCases::new(
            profiles.clone(),
            Arc::new(SchedulingPolicy::default()),
            clock.clone(),
        ));
        let reminders = ReminderUseCases::new(
            slots.clone(),
            users.clone(),
            quota,
            scheduling,
            notifier.clone(),
            clock,
            frontend,
        );

        Harness {
            reminders,
            slots,
            plans,
            resources,
            profiles,
            users,
            notifier,
            now,
        }
    }

    #[tokio::test]
    async fn plan_and_save_persists_future_slots() {
        let h = harness();
        let user_id = Uuid::new_v4();
        h.profiles.insert(creator_profile_factory(|p| {
            p.user_id = user_id;
        }));

        let saved = h
            .reminders
            .plan_and_save(user_id, "instagram", Some(4), 7, true)
            .await
            .unwrap();

        assert_eq!(saved.len(), 4);
        for slot in &saved {
            assert_eq!(slot.platform, "instagram");
            assert!(slot.notify);
            assert!(slot.reminded_at.is_none());
            assert!(slot.scheduled_at > h.now);
        }
    }

    #[tokio::test]
    async fn plan_and_save_respects_reminder_quota() {
        let h = harness();
        let user_id = Uuid::new_v4();
        h.profiles.insert(creator_profile_factory(|p| {
            p.user_id = user_id;
        }));
        // Free fallback plan has no reminder cap, so install one.
        h.plans.insert(plan_factory(|p| {
            p.slug = "free".to_string();
            p.posting_reminders_per_month = Some(5);
        }));
        h.resources.set_reminders(user_id, 2025, 3, 5);

        let err = h
            .reminders
            .plan_and_save(user_id, "instagram", Some(4), 7, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded(_)));
        assert!(h.slots.all().is_empty());
    }

    #[tokio::test]
    async fn plan_batch_counts_whole_batch_against_reminder_cap() {
        let h = harness();
        h.plans.insert(plan_factory(|p| {
            p.slug = "free".to_string();
            p.posting_reminders_per_month = Some(5);
        }));

        // One unit of headroom left, but the plan produces seven slots.
        let over = Uuid::new_v4();
        h.profiles.insert(creator_profile_factory(|p| {
            p.user_id = over;
        }));
        h.resources.set_reminders(over, 2025, 3, 4);
        let err = h
            .reminders
            .plan_and_save(over, "instagram", Some(7), 7, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded(_)));
        assert!(h.slots.all().is_empty());

        // A batch that exactly fills the cap still goes through.
        let fits = Uuid::new_v4();
        h.profiles.insert(creator_profile_factory(|p| {
            p.user_id = fits;
        }));
        h.resources.set_reminders(fits, 2025, 3, 1);
        let saved = h
            .reminders
            .plan_and_save(fits, "instagram", Some(4), 7, true)
            .await
            .unwrap();
        assert_eq!(saved.len(), 4);
    }

    #[tokio::test]
    async fn dispatch_sends_once_per_slot() {
        let h = harness();
        let user = h.users.insert(user_contact_factory(|u| {
            u.email = "due@example.com".to_string();
        }));
        h.slots.seed(NewPlannedSlot {
            user_id: user.id,
            platform: "tiktok".to_string(),
            scheduled_at: h.now + Duration::minutes(1),
            title: "Suggested content: trend".to_string(),
            notify: true,
        });

        let sent = h.reminders.dispatch_due_reminders().await.unwrap();
        assert_eq!(sent, 1);
        let emails = h.notifier.sent();
        assert_eq!(emails[0].to, "due@example.com");
        assert!(emails[0].subject.contains("tiktok"));

        // Already claimed, so the next tick is silent.
        let sent = h.reminders.dispatch_due_reminders().await.unwrap();
        assert_eq!(sent, 0);
        assert_eq!(h.notifier.sent_count(), 1);
    }

    #[tokio::test]
    async fn dispatch_skips_out_of_window_and_muted_slots() {
        let h = harness();
        let user = h.users.insert(user_contact_factory(|_| {}));
        h.slots.seed(NewPlannedSlot {
            user_id: user.id,
            platform: "twitter".to_string(),
            scheduled_at: h.now + Duration::hours(3),
            title: String::new(),
            notify: true,
        });
        h.slots.seed(NewPlannedSlot {
            user_id: user.id,
            platform: "twitter".to_string(),
            scheduled_at: h.now,
            title: String::new(),
            notify: false,
        });

        let sent = h.reminders.dispatch_due_reminders().await.unwrap();
        assert_eq!(sent, 0);
        assert_eq!(h.notifier.sent_count(), 0);
    }
}
