use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::controller::local_health;

/// Always-healthy target for trying the agent locally (`--local`)
pub fn local_target_routes() -> Router {
    Router::new()
        .route("/health", get(local_health))
        .layer(TraceLayer::new_for_http())
}
