use axum::http::StatusCode;

/// Handler for GET /health on the local test server
pub async fn local_health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Local test server is healthy")
}
