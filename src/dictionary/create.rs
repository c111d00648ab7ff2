//! Creation page and endpoint for statuses, types and categories.

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
        DictionaryKind, EntryFormData, create_entry,
        form::{FormMethod, NameCheck, check_entry_name, entry_form_view, entry_page_view},
    },
    endpoints::{self, format_endpoint},
};

/// The state needed for creating a dictionary entry.
#[derive(Debug, Clone)]
pub struct CreateEntryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateEntryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the creation page for the dictionary `kind`.
///
/// Subcategories need a category as well as a name, so their form lives on its own page.
pub async fn get_new_entry_page(Path(kind): Path<DictionaryKind>) -> Response {
    if kind == DictionaryKind::SubCategory {
        return Redirect::to(endpoints::NEW_SUBCATEGORY_VIEW).into_response();
    }

    let new_entry_endpoint = format_endpoint(endpoints::NEW_DICTIONARY_ENTRY_VIEW, kind);
    let create_endpoint = format_endpoint(endpoints::POST_DICTIONARY_ENTRY, kind);
    let form = entry_form_view(kind, FormMethod::Post, &create_endpoint, "", "");

    entry_page_view(
        &format!("Create {}", kind.label()),
        &new_entry_endpoint,
        &form,
    )
    .into_response()
}

/// Handle the creation form submission for the dictionary `kind`.
pub async fn create_entry_endpoint(
    Path(kind): Path<DictionaryKind>,
    State(state): State<CreateEntryEndpointState>,
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

    let create_endpoint = format_endpoint(endpoints::POST_DICTIONARY_ENTRY, kind);

    let name = match check_entry_name(kind, &form_data.name, None, &connection) {
        Ok(NameCheck::Valid(name)) => name,
        Ok(NameCheck::Invalid(error_message)) => {
            return entry_form_view(
                kind,
                FormMethod::Post,
                &create_endpoint,
                &form_data.name,
                &error_message,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not validate the new {kind} name: {error}");
            return error.into_alert_response();
        }
    };

    match create_entry(kind, name, &connection) {
        Ok(entry) => {
            tracing::debug!("Created {kind} {}", entry.id);

            (
                HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a {kind}: {error}");

            error.into_alert_response()
        }
    }
}


#[cfg(test)]
mod create_entry_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    };

    use crate::{
        dictionary::{
            DictionaryEntry, DictionaryKind, EntryFormData, EntryName, MAX_NAME_LENGTH,
            create::CreateEntryEndpointState, create_entry, create_entry_endpoint,
            get_all_entries, get_entry,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, get_header,
            get_test_connection, must_get_form, parse_html_fragment,
        },
    };

    fn get_state() -> CreateEntryEndpointState {
        CreateEntryEndpointState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    fn form(name: &str) -> Form<EntryFormData> {
        Form(EntryFormData {
            name: name.to_owned(),
        })
    }

    #[tokio::test]
    async fn can_create_entry() {
        let state = get_state();
        let want = DictionaryEntry {
            id: 1,
            name: EntryName::new_unchecked("Business"),
        };

        let response = create_entry_endpoint(
            Path(DictionaryKind::Status),
            State(state.clone()),
            form("  Business "),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DICTIONARIES_VIEW);
        assert_eq!(
            Ok(want),
            get_entry(
                DictionaryKind::Status,
                1,
                &state.db_connection.lock().unwrap()
            )
        );
    }

    #[tokio::test]
    async fn create_fails_on_empty_name() {
        let state = get_state();

        let response = create_entry_endpoint(Path(DictionaryKind::Type), State(state), form(""))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Name cannot be empty");
    }

    #[tokio::test]
    async fn create_fails_on_long_name() {
        let state = get_state();
        let name = "a".repeat(MAX_NAME_LENGTH + 1);

        let response =
            create_entry_endpoint(Path(DictionaryKind::Type), State(state), form(&name))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Name cannot be longer than 100 characters");
    }

    #[tokio::test]
    async fn create_fails_on_duplicate_name_ignoring_case() {
        let state = get_state();
        create_entry(
            DictionaryKind::Category,
            EntryName::new_unchecked("Marketing"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = create_entry_endpoint(
            Path(DictionaryKind::Category),
            State(state.clone()),
            form("MARKETING"),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(
            &form,
            "Error: A category named \"MARKETING\" already exists",
        );
        let entries = get_all_entries(
            DictionaryKind::Category,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_subcategory_kind() {
        let state = get_state();

        let response = create_entry_endpoint(
            Path(DictionaryKind::SubCategory),
            State(state),
            form("Avito"),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
