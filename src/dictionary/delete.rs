//! Deletion confirmation page and endpoint for every dictionary, subcategories included.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dictionary::{
        DeletionImpact, DictionaryKind, EntryId, delete_with_dependents, get_entry,
        preview_deletion,
    },
    endpoints::{self, format_endpoint},
    html::{BUTTON_DANGER_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    notice::{Notice, set_notice},
    subcategory::get_subcategory_listing,
};

/// The state needed for deleting a dictionary entry.
#[derive(Debug, Clone)]
pub struct DeleteEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The name shown to the user, e.g. "Avito (Marketing)" for a subcategory.
fn entry_display_name(
    kind: DictionaryKind,
    entry_id: EntryId,
    connection: &Connection,
) -> Result<String, Error> {
    match kind {
        DictionaryKind::SubCategory => {
            get_subcategory_listing(entry_id, connection).map(|listing| listing.to_string())
        }
        _ => get_entry(kind, entry_id, connection).map(|entry| entry.name.to_string()),
    }
}

/// Render the page asking the user to confirm deleting an entry and everything that uses it.
pub async fn get_delete_entry_page(
    Path((kind, entry_id)): Path<(DictionaryKind, EntryId)>,
    State(state): State<DeleteEntryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let name = entry_display_name(kind, entry_id, &connection)?;
    let impact = preview_deletion(kind, entry_id, &connection).inspect_err(|error| {
        tracing::error!("Could not preview deleting {kind} {entry_id}: {error}")
    })?;

    Ok(confirm_delete_view(kind, entry_id, &name, impact).into_response())
}

/// Delete an entry and everything that uses it, then return to the dictionaries page.
///
/// The outcome, success or failure, is reported with a notice on the dictionaries page.
pub async fn delete_entry_endpoint(
    Path((kind, entry_id)): Path<(DictionaryKind, EntryId)>,
    State(state): State<DeleteEntryState>,
    jar: PrivateCookieJar,
) -> Response {
    let notice = match delete_entry(kind, entry_id, &state) {
        Ok(message) => Notice::Success(message),
        Err(Error::NotFound | Error::DeleteMissingEntry(_)) => Notice::Error(format!(
            "Could not delete {kind}: it could not be found. It may have already been deleted."
        )),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting {kind} {entry_id}: {error}"
            );
            Notice::Error(format!(
                "Could not delete {kind}: an unexpected error occurred, \
                check the server logs for more details."
            ))
        }
    };

    (
        set_notice(jar, &notice),
        HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn delete_entry(
    kind: DictionaryKind,
    entry_id: EntryId,
    state: &DeleteEntryState,
) -> Result<String, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let name = entry_display_name(kind, entry_id, &connection)?;
    let impact = delete_with_dependents(kind, entry_id, &connection)?;

    tracing::info!("Deleted {kind} {entry_id} along with {impact:?}");

    Ok(impact.deleted_message(kind, &name))
}

fn confirm_delete_view(
    kind: DictionaryKind,
    entry_id: EntryId,
    name: &str,
    impact: DeletionImpact,
) -> Markup {
    let delete_endpoint = format_endpoint(
        &format_endpoint(endpoints::DELETE_DICTIONARY_ENTRY, kind),
        entry_id,
    );
    let nav_bar = NavBar::new(endpoints::DELETE_DICTIONARY_ENTRY_VIEW).into_html();
    let title = format!("Delete {}", kind.label());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { (title) }

            p class="mb-2"
            {
                "Are you sure you want to delete the " (kind) " \"" (name) "\"?"
            }

            p id="deletion-impact" class="mb-4 font-semibold text-red-600 dark:text-red-400"
            {
                (impact.warning_message(kind))
            }

            form
                hx-post=(delete_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                button type="submit" class=(BUTTON_DANGER_STYLE) { "Delete" }
            }

            a href=(endpoints::DICTIONARIES_VIEW) class={ (LINK_STYLE) " mt-4" } { "Cancel" }
        }
    };

    base(&title, &[], &content)
}
