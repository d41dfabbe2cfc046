use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::ports::{clock::Clock, notifications::NotificationSender},
    domain::entities::{
        creator_profile::CreatorProfile, monthly_usage::MonthlyUsage, plan::Plan,
        planned_slot::PlannedPostSlot, subscription::Subscription,
    },
    use_cases::{
        quota::{
            CounterKind, MonthlyUsageRepo, PlanRepo, PlanSeed, ResourceCountRepo,
            SubscriptionRepo, UsageDelta, UserContact, UserRepo,
        },
        reminders::{NewPlannedSlot, PlannedSlotRepo},
        scheduling::CreatorProfileRepo,
    },
};

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPlanRepo {
    plans: Mutex<HashMap<Uuid, Plan>>,
}

impl InMemoryPlanRepo {
    pub fn insert(&self, plan: Plan) -> Plan {
        self.plans.lock().unwrap().insert(plan.id, plan.clone());
        plan
    }
}

#[async_trait]
impl PlanRepo for InMemoryPlanRepo {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Plan>> {
        Ok(self.plans.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Plan>> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Plan>> {
        let mut plans: Vec<Plan> = self.plans.lock().unwrap().values().cloned().collect();
        plans.sort_by_key(|p| p.price_usd_cents);
        Ok(plans)
    }

    async fn upsert_by_slug(&self, seed: &PlanSeed) -> AppResult<Plan> {
        let mut plans = self.plans.lock().unwrap();
        let id = plans
            .values()
            .find(|p| p.slug == seed.slug)
            .map(|p| p.id)
            .unwrap_or_else(Uuid::new_v4);
        let plan = Plan {
            id,
            slug: seed.slug.clone(),
            name: seed.name.clone(),
            price_usd_cents: seed.price_usd_cents,
            stripe_price_id: seed.stripe_price_id.clone(),
            ideas_per_month: seed.ideas_per_month,
            captions_per_month: seed.captions_per_month,
            drafts_limit: seed.drafts_limit,
            media_uploads_per_month: seed.media_uploads_per_month,
            posting_reminders_per_month: seed.posting_reminders_per_month,
            max_upload_mb: seed.max_upload_mb,
            max_video_seconds: seed.max_video_seconds,
            created_at: None,
        };
        plans.insert(id, plan.clone());
        Ok(plan)
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    subs: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn insert(&self, sub: Subscription) {
        self.subs.lock().unwrap().push(sub);
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn find_latest_for_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self
            .subs
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.start_date)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryMonthlyUsageRepo {
    rows: Mutex<HashMap<(Uuid, i32, i32), MonthlyUsage>>,
}

impl InMemoryMonthlyUsageRepo {
    pub fn set_counts(&self, user_id: Uuid, year: i32, month: i32, ideas: i32, captions: i32) {
        self.rows.lock().unwrap().insert(
            (user_id, year, month),
            MonthlyUsage {
                id: Uuid::new_v4(),
                user_id,
                year,
                month,
                ideas_used: ideas,
                captions_used: captions,
            },
        );
    }
}

#[async_trait]
impl MonthlyUsageRepo for InMemoryMonthlyUsageRepo {
    async fn find(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<Option<MonthlyUsage>> {
        Ok(self.rows.lock().unwrap().get(&(user_id, year, month)).cloned())
    }

    async fn increment(
        &self,
        user_id: Uuid,
        year: i32,
        month: i32,
        kind: CounterKind,
        amount: i32,
    ) -> AppResult<UsageDelta> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.entry((user_id, year, month)).or_insert(MonthlyUsage {
            id: Uuid::new_v4(),
            user_id,
            year,
            month,
            ideas_used: 0,
            captions_used: 0,
        });
        let counter = match kind {
            CounterKind::Idea => &mut row.ideas_used,
            CounterKind::Caption => &mut row.captions_used,
        };
        let previous = *counter;
        *counter += amount;
        Ok(UsageDelta {
            previous,
            current: *counter,
        })
    }
}

#[derive(Default)]
pub struct InMemoryResourceCountRepo {
    drafts: Mutex<HashMap<Uuid, i64>>,
    uploads: Mutex<HashMap<(Uuid, i32, i32), i64>>,
    reminders: Mutex<HashMap<(Uuid, i32, i32), i64>>,
}

impl InMemoryResourceCountRepo {
    pub fn set_drafts(&self, user_id: Uuid, count: i64) {
        self.drafts.lock().unwrap().insert(user_id, count);
    }

    pub fn set_media_uploads(&self, user_id: Uuid, year: i32, month: i32, count: i64) {
        self.uploads.lock().unwrap().insert((user_id, year, month), count);
    }

    pub fn set_reminders(&self, user_id: Uuid, year: i32, month: i32, count: i64) {
        self.reminders.lock().unwrap().insert((user_id, year, month), count);
    }
}

#[async_trait]
impl ResourceCountRepo for InMemoryResourceCountRepo {
    async fn active_drafts_count(&self, user_id: Uuid) -> AppResult<i64> {
        Ok(*self.drafts.lock().unwrap().get(&user_id).unwrap_or(&0))
    }

    async fn media_uploads_in_month(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<i64> {
        Ok(*self
            .uploads
            .lock()
            .unwrap()
            .get(&(user_id, year, month))
            .unwrap_or(&0))
    }

    async fn reminders_in_month(&self, user_id: Uuid, year: i32, month: i32) -> AppResult<i64> {
        Ok(*self
            .reminders
            .lock()
            .unwrap()
            .get(&(user_id, year, month))
            .unwrap_or(&0))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepo {
    users: Mutex<HashMap<Uuid, UserContact>>,
}

impl InMemoryUserRepo {
    pub fn insert(&self, contact: UserContact) -> UserContact {
        self.users.lock().unwrap().insert(contact.id, contact.clone());
        contact
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_contact(&self, user_id: Uuid) -> AppResult<Option<UserContact>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn list_active_contacts(&self) -> AppResult<Vec<UserContact>> {
        let mut contacts: Vec<UserContact> =
            self.users.lock().unwrap().values().cloned().collect();
        contacts.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(contacts)
    }
}

#[derive(Default)]
pub struct InMemoryCreatorProfileRepo {
    profiles: Mutex<HashMap<Uuid, CreatorProfile>>,
}

impl InMemoryCreatorProfileRepo {
    pub fn insert(&self, profile: CreatorProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
    }
}

#[async_trait]
impl CreatorProfileRepo for InMemoryCreatorProfileRepo {
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Option<CreatorProfile>> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPlannedSlotRepo {
    slots: Mutex<Vec<PlannedPostSlot>>,
}

impl InMemoryPlannedSlotRepo {
    pub fn seed(&self, slot: NewPlannedSlot) -> PlannedPostSlot {
        let row = materialize(&slot);
        self.slots.lock().unwrap().push(row.clone());
        row
    }

    pub fn all(&self) -> Vec<PlannedPostSlot> {
        self.slots.lock().unwrap().clone()
    }
}

fn materialize(slot: &NewPlannedSlot) -> PlannedPostSlot {
    PlannedPostSlot {
        id: Uuid::new_v4(),
        user_id: slot.user_id,
        platform: slot.platform.clone(),
        scheduled_at: slot.scheduled_at,
        title: slot.title.clone(),
        notify: slot.notify,
        reminded_at: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl PlannedSlotRepo for InMemoryPlannedSlotRepo {
    async fn insert_many(&self, new_slots: &[NewPlannedSlot]) -> AppResult<Vec<PlannedPostSlot>> {
        let mut slots = self.slots.lock().unwrap();
        let mut saved = Vec::with_capacity(new_slots.len());
        for slot in new_slots {
            let row = materialize(slot);
            slots.push(row.clone());
            saved.push(row);
        }
        Ok(saved)
    }

    async fn claim_due(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        reminded_at: DateTime<Utc>,
    ) -> AppResult<Vec<PlannedPostSlot>> {
        let mut slots = self.slots.lock().unwrap();
        let mut claimed = Vec::new();
        for slot in slots.iter_mut() {
            if slot.notify
                && slot.reminded_at.is_none()
                && slot.scheduled_at >= window_start
                && slot.scheduled_at <= window_end
            {
                slot.reminded_at = Some(reminded_at);
                claimed.push(slot.clone());
            }
        }
        Ok(claimed)
    }
}
