use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use formbook_core::{EntryName, NewEntry};
use formbook_infra::EntryStore;

use crate::app::{dto, errors::AppError, AppState};
use crate::html;

pub const ENTRIES_PATH: &str = "/entries";

pub async fn form() -> Html<String> {
    Html(html::form_page())
}

/// Store a non-empty name, then send the caller to the listing.
///
/// A body that is not a form is treated like a form without `name`.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, AppError> {
    let raw = submitted_form(form).name;

    match EntryName::parse(raw) {
        Some(name) => {
            let stored = state.store.insert(NewEntry::new(name)).await?;
            tracing::info!(entry_id = %stored.id, "entry created");
        }
        None => tracing::debug!("empty submission; nothing stored"),
    }

    Ok(redirect_to_entries())
}

pub async fn list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let entries = state.store.list_newest_first().await?;
    Ok(Html(html::entries_page(&entries)))
}

fn submitted_form(form: Result<Form<Vec<(String, String)>>, FormRejection>) -> dto::SubmitForm {
    match form {
        Ok(Form(pairs)) => dto::SubmitForm::from_pairs(pairs),
        Err(FormRejection::InvalidFormContentType(_)) => {
            tracing::debug!("submission is not form-encoded; treating name as absent");
            dto::SubmitForm::default()
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable form submission; treating name as absent");
            dto::SubmitForm::default()
        }
    }
}

fn redirect_to_entries() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, ENTRIES_PATH)]).into_response()
}
