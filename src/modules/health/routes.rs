use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller::health_check;
use crate::AppState;

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
