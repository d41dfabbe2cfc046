use std::sync::Arc;

use tracing::info;

use crate::{
    app_error::AppResult,
    use_cases::quota::{PlanRepo, PlanSeed},
};

fn default_catalog() -> Vec<PlanSeed> {
    vec![
        PlanSeed {
            slug: "free".to_string(),
            name: "Free".to_string(),
            price_usd_cents: 0,
            stripe_price_id: None,
            ideas_per_month: 50,
            captions_per_month: 30,
            drafts_limit: Some(25),
            media_uploads_per_month: Some(20),
            posting_reminders_per_month: Some(20),
            max_upload_mb: 20,
            max_video_seconds: 60,
        },
        PlanSeed {
            slug: "monthly".to_string(),
            name: "Monthly".to_string(),
            price_usd_cents: 1199,
            stripe_price_id: None,
            ideas_per_month: 300,
            captions_per_month: 200,
            drafts_limit: Some(200),
            media_uploads_per_month: Some(150),
            posting_reminders_per_month: Some(200),
            max_upload_mb: 200,
            max_video_seconds: 180,
        },
        PlanSeed {
            slug: "quarterly".to_string(),
            name: "Quarterly".to_string(),
            price_usd_cents: 3240,
            stripe_price_id: None,
            ideas_per_month: 900,
            captions_per_month: 600,
            drafts_limit: Some(600),
            media_uploads_per_month: Some(450),
            posting_reminders_per_month: Some(600),
            max_upload_mb: 200,
            max_video_seconds: 180,
        },
        PlanSeed {
            slug: "yearly".to_string(),
            name: "Yearly".to_string(),
            price_usd_cents: 11520,
            stripe_price_id: None,
            ideas_per_month: 3600,
            captions_per_month: 2400,
            drafts_limit: Some(2400),
            media_uploads_per_month: Some(1800),
            posting_reminders_per_month: Some(2400),
            max_upload_mb: 200,
            max_video_seconds: 180,
        },
    ]
}

/// Installs or refreshes the default plan catalog. Idempotent, keyed on slug.
pub async fn ensure_default_plans(plans: &Arc<dyn PlanRepo>) -> AppResult<()> {
    for seed in default_catalog() {
        let plan = plans.upsert_by_slug(&seed).await?;
        info!(slug = %plan.slug, "Plan seeded");
    }
    Ok(())
}
