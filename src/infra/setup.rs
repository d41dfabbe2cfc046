use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        email::resend::ResendEmailSender,
        http::app_state::AppState,
        persistence::PostgresPersistence,
    },
    application::ports::{clock::SystemClock, notifications::NotificationSender},
    infra::{config::AppConfig, db::init_db, seed_plans::ensure_default_plans},
    use_cases::{
        quota::{MonthlyUsageRepo, PlanRepo, QuotaUseCases, ResourceCountRepo, SubscriptionRepo, UserRepo},
        reminders::{PlannedSlotRepo, ReminderUseCases},
        scheduling::{CreatorProfileRepo, SchedulingPolicy, SchedulingUseCases},
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let pool = init_db(&config.database_url).await?;
    let postgres_arc = Arc::new(PostgresPersistence::new(pool));

    let plan_repo = postgres_arc.clone() as Arc<dyn PlanRepo>;
    let subscription_repo = postgres_arc.clone() as Arc<dyn SubscriptionRepo>;
    let usage_repo = postgres_arc.clone() as Arc<dyn MonthlyUsageRepo>;
    let resource_repo = postgres_arc.clone() as Arc<dyn ResourceCountRepo>;
    let user_repo = postgres_arc.clone() as Arc<dyn UserRepo>;
    let profile_repo = postgres_arc.clone() as Arc<dyn CreatorProfileRepo>;
    let slot_repo = postgres_arc.clone() as Arc<dyn PlannedSlotRepo>;

    if config.seed_plans {
        ensure_default_plans(&plan_repo)
            .await
            .map_err(|e| anyhow::anyhow!("plan seeding failed: {e}"))?;
    }

    let email = Arc::new(ResendEmailSender::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    )) as Arc<dyn NotificationSender>;
    let clock = Arc::new(SystemClock);

    let quota_use_cases = Arc::new(QuotaUseCases::new(
        plan_repo,
        subscription_repo,
        usage_repo,
        resource_repo,
        user_repo.clone(),
        email.clone(),
        clock.clone(),
        config.frontend_url.clone(),
    ));

    let scheduling_use_cases = Arc::new(SchedulingUseCases::new(
        profile_repo,
        Arc::new(SchedulingPolicy::default()),
        clock.clone(),
    ));

    let reminder_use_cases = Arc::new(ReminderUseCases::new(
        slot_repo,
        user_repo,
        quota_use_cases.clone(),
        scheduling_use_cases.clone(),
        email,
        clock,
        config.frontend_url.clone(),
    ));

    Ok(AppState {
        config: Arc::new(config),
        quota_use_cases,
        scheduling_use_cases,
        reminder_use_cases,
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "polypost_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
