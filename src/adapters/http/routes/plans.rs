use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    domain::entities::plan::Plan,
};

#[derive(Serialize)]
struct PlansResponse {
    items: Vec<Plan>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}

async fn list(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = app_state.quota_use_cases.list_plans().await?;
    Ok(Json(PlansResponse { items }))
}
