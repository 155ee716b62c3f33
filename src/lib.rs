pub mod config;
pub mod modules;
pub mod services;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use modules::health::health_routes;
use services::monitor::MonitorState;

pub struct AppState {
    pub monitor: Arc<MonitorState>,
    pub service_name: String,
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
