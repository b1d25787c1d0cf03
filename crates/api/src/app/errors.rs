use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use formbook_infra::StoreError;

use crate::html;

/// Failure of a request handler.
///
/// Detail is logged, never rendered.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(err) => {
                tracing::error!(operation = err.operation(), error = %err, "store operation failed");
            }
        }
        html_error(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

pub fn html_error(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    (status, Html(html::error_page(status.as_u16(), reason))).into_response()
}
