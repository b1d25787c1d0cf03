use axum::{
    routing::{get, post},
    Router,
};

use crate::app::AppState;

pub mod entries;
pub mod system;

/// Router for the form and listing pages.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(entries::form))
        .route("/submit", post(entries::submit))
        .route("/entries", get(entries::list))
}
