//! Editing page and endpoint for statuses, types and categories.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dictionary::{
        DictionaryKind, EntryFormData, EntryId, get_entry,
        form::{FormMethod, NameCheck, check_entry_name, entry_form_view, entry_page_view},
        update_entry,
    },
    endpoints::{self, format_endpoint},
};

/// The state needed for the edit page and the update endpoint.
#[derive(Debug, Clone)]
pub struct EditEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn entry_endpoint(endpoint_path: &str, kind: DictionaryKind, entry_id: EntryId) -> String {
    format_endpoint(&format_endpoint(endpoint_path, kind), entry_id)
}

/// Render the editing page for an entry of the dictionary `kind`.
pub async fn get_edit_entry_page(
    Path((kind, entry_id)): Path<(DictionaryKind, EntryId)>,
    State(state): State<EditEntryState>,
) -> Result<Response, Error> {
    if kind == DictionaryKind::SubCategory {
        return Ok(
            Redirect::to(&format_endpoint(endpoints::EDIT_SUBCATEGORY_VIEW, entry_id))
                .into_response(),
        );
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = get_entry(kind, entry_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve {kind} {entry_id}: {error}");
        }
    })?;

    let edit_endpoint = entry_endpoint(endpoints::EDIT_DICTIONARY_ENTRY_VIEW, kind, entry_id);
    let update_endpoint = entry_endpoint(endpoints::PUT_DICTIONARY_ENTRY, kind, entry_id);
    let form = entry_form_view(
        kind,
        FormMethod::Put,
        &update_endpoint,
        entry.name.as_ref(),
        "",
    );

    Ok(entry_page_view(&format!("Edit {}", kind.label()), &edit_endpoint, &form).into_response())
}

/// Handle the editing form submission for an entry of the dictionary `kind`.
pub async fn update_entry_endpoint(
    Path((kind, entry_id)): Path<(DictionaryKind, EntryId)>,
    State(state): State<EditEntryState>,
    Form(form_data): Form<EntryFormData>,
) -> Response {
    if kind == DictionaryKind::SubCategory {
        return Error::NotFound.into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update_endpoint = entry_endpoint(endpoints::PUT_DICTIONARY_ENTRY, kind, entry_id);

    let name = match check_entry_name(kind, &form_data.name, Some(entry_id), &connection) {
        Ok(NameCheck::Valid(name)) => name,
        Ok(NameCheck::Invalid(error_message)) => {
            return entry_form_view(
                kind,
                FormMethod::Put,
                &update_endpoint,
                &form_data.name,
                &error_message,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not validate the name for {kind} {entry_id}: {error}");
            return error.into_alert_response();
        }
    };

    match update_entry(kind, entry_id, name, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::UpdateMissingEntry(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating {kind} {entry_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
