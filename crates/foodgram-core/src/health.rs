use axum::http::StatusCode;

/// Handler for `GET /healthz`. Liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
