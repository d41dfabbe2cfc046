use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        quota::QuotaUseCases, reminders::ReminderUseCases, scheduling::SchedulingUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub quota_use_cases: Arc<QuotaUseCases>,
    pub scheduling_use_cases: Arc<SchedulingUseCases>,
    pub reminder_use_cases: Arc<ReminderUseCases>,
}
