use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use super::model::evaluate;
use crate::AppState;

/// Handler for GET /health
/// 200 while the last successful ping is fresh, 503 otherwise
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    match evaluate(state.monitor.last_success_at(), Utc::now()).reason() {
        None => (
            StatusCode::OK,
            format!("{} is healthy", state.service_name),
        )
            .into_response(),
        Some(reason) => (StatusCode::SERVICE_UNAVAILABLE, reason).into_response(),
    }
}
