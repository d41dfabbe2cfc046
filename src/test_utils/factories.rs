use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{
    creator_profile::CreatorProfile, plan::Plan, subscription::Subscription,
};
use crate::use_cases::quota::UserContact;

pub fn plan_factory(overrides: impl FnOnce(&mut Plan)) -> Plan {
    let mut plan = Plan {
        id: Uuid::new_v4(),
        slug: "test".to_string(),
        name: "Test".to_string(),
        price_usd_cents: 0,
        stripe_price_id: None,
        ideas_per_month: 100,
        captions_per_month: 100,
        drafts_limit: None,
        media_uploads_per_month: None,
        posting_reminders_per_month: None,
        max_upload_mb: 20,
        max_video_seconds: 60,
        created_at: None,
    };
    overrides(&mut plan);
    plan
}

pub fn subscription_factory(overrides: impl FnOnce(&mut Subscription)) -> Subscription {
    let mut sub = Subscription {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        plan_id: None,
        stripe_customer_id: None,
        stripe_subscription_id: None,
        start_date: Utc::now(),
        end_date: None,
    };
    overrides(&mut sub);
    sub
}

pub fn user_contact_factory(overrides: impl FnOnce(&mut UserContact)) -> UserContact {
    let mut contact = UserContact {
        id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
        username: "user".to_string(),
    };
    overrides(&mut contact);
    contact
}

pub fn creator_profile_factory(overrides: impl FnOnce(&mut CreatorProfile)) -> CreatorProfile {
    let mut profile = CreatorProfile {
        user_id: Uuid::new_v4(),
        timezone: "UTC".to_string(),
        default_platform: "instagram".to_string(),
        preferred_platforms: Vec::new(),
        creator_stage: "growing".to_string(),
        goal: None,
    };
    overrides(&mut profile);
    profile
}
