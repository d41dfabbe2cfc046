use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One-to-one with a user. `plan_id` is nullable; an absent or inactive
/// subscription falls back to the free plan at resolution time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Active iff the validity window is open: no end date, or an end date
    /// still in the future.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.end_date {
            None => true,
            Some(end) => end > now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(end_date: Option<DateTime<Utc>>) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: Some(Uuid::new_v4()),
            stripe_customer_id: None,
            stripe_subscription_id: None,
            start_date: now - Duration::days(10),
            end_date,
        }
    }

    #[test]
    fn open_ended_subscription_is_active() {
        let now = Utc::now();
        assert!(sample(None).is_active_at(now));
    }

    #[test]
    fn future_end_date_is_active() {
        let now = Utc::now();
        assert!(sample(Some(now + Duration::days(1))).is_active_at(now));
    }

    #[test]
    fn past_end_date_is_inactive() {
        let now = Utc::now();
        assert!(!sample(Some(now - Duration::seconds(1))).is_active_at(now));
        // boundary: an end date equal to "now" is already expired
        assert!(!sample(Some(now)).is_active_at(now));
    }
}
