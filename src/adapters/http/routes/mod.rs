pub mod plans;
pub mod scheduling;
pub mod usage;


use axum::{http::HeaderMap, Router};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/scheduling", scheduling::router())
        .nest("/usage", usage::router())
        .nest("/plans", plans::router())
}

/// Caller identity comes from the gateway as an `X-User-Id` header.
pub(crate) fn current_user_id(headers: &HeaderMap) -> AppResult<Uuid> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or(AppError::InvalidCredentials)
}
