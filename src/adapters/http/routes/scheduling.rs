use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, routes::current_user_id},
    app_error::{AppError, AppResult},
    use_cases::scheduling::SuggestedSlot,
};

const MAX_DAYS_AHEAD: u32 = 90;

#[derive(Deserialize)]
struct SuggestionsQuery {
    platform: String,
    #[serde(default = "default_timezone")]
    timezone: String,
    #[serde(default = "default_suggestion_days")]
    days_ahead: u32,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_suggestion_days() -> u32 {
    7
}

#[derive(Deserialize)]
struct PlanPayload {
    #[serde(default = "default_plan_platform")]
    platform: String,
    posts_per_week: Option<u32>,
    #[serde(default = "default_plan_days")]
    days_ahead: u32,
    #[serde(default)]
    notify: bool,
}

fn default_plan_platform() -> String {
    "all".to_string()
}

fn default_plan_days() -> u32 {
    14
}

#[derive(Serialize)]
struct SuggestionsResponse {
    items: Vec<SuggestedSlot>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(suggestions))
        .route("/plan", post(plan))
}

async fn suggestions(
    State(app_state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> AppResult<impl IntoResponse> {
    validate_days_ahead(query.days_ahead)?;
    let items = app_state.scheduling_use_cases.generate_posting_suggestions(
        &query.platform,
        &query.timezone,
        query.days_ahead,
    );
    Ok(Json(SuggestionsResponse { items }))
}

async fn plan(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PlanPayload>,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user_id(&headers)?;
    validate_days_ahead(payload.days_ahead)?;

    let slots = app_state
        .reminder_use_cases
        .plan_and_save(
            user_id,
            &payload.platform,
            payload.posts_per_week,
            payload.days_ahead,
            payload.notify,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(slots)))
}

fn validate_days_ahead(days_ahead: u32) -> AppResult<()> {
    if days_ahead == 0 || days_ahead > MAX_DAYS_AHEAD {
        return Err(AppError::InvalidInput(format!(
            "days_ahead must be between 1 and {MAX_DAYS_AHEAD}"
        )));
    }
    Ok(())
}
