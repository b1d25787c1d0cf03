use axum::{extract::State, http::StatusCode, response::Response};

use formbook_infra::EntryStore;

use crate::app::{errors, AppState};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// 200 when the store answers, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> Result<StatusCode, Response> {
    match state.store.ping().await {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            Err(errors::html_error(StatusCode::SERVICE_UNAVAILABLE))
        }
    }
}

pub async fn not_found() -> Response {
    errors::html_error(StatusCode::NOT_FOUND)
}
