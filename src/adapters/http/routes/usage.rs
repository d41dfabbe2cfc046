use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, routes::current_user_id},
    app_error::{AppError, AppResult},
    use_cases::quota::CounterKind,
};

#[derive(Deserialize)]
struct CheckQuery {
    kind: String,
    #[serde(default = "default_amount")]
    amount: i32,
}

#[derive(Deserialize)]
struct IncrementPayload {
    kind: String,
    #[serde(default = "default_amount")]
    amount: i32,
}

fn default_amount() -> i32 {
    1
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IncrementResponse {
    kind: String,
    previous: i32,
    current: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(overview))
        .route("/check", get(check))
        .route("/increment", post(increment))
}

async fn overview(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user_id(&headers)?;
    let overview = app_state.quota_use_cases.usage_overview(user_id).await?;
    Ok(Json(overview))
}

async fn check(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CheckQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user_id(&headers)?;
    let check = app_state
        .quota_use_cases
        .check_usage_allowed_by_name(user_id, &query.kind, query.amount)
        .await?;
    Ok(Json(check))
}

async fn increment(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<IncrementPayload>,
) -> AppResult<impl IntoResponse> {
    let user_id = current_user_id(&headers)?;
    let kind = match payload.kind.as_str() {
        "idea" => CounterKind::Idea,
        "caption" => CounterKind::Caption,
        other => {
            return Err(AppError::InvalidInput(format!(
                "'{other}' is not a counter-backed usage kind"
            )));
        }
    };

    let delta = app_state
        .quota_use_cases
        .increment_usage(user_id, kind, payload.amount)
        .await?;
    Ok(Json(IncrementResponse {
        kind: payload.kind,
        previous: delta.previous,
        current: delta.current,
    }))
}
