use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dictionary::{
        DictionaryKind, EntryId, form::FormMethod, form::entry_page_view, get_all_entries,
    },
    endpoints::{self, format_endpoint},
    subcategory::{
        SubCategoryFormData,
        form::{SubCategoryCheck, SubCategoryForm, SubCategoryFormErrors, check_subcategory_form},
        get_subcategory, update_subcategory,
    },
};

/// The state needed for the subcategory edit page and update endpoint.
#[derive(Debug, Clone)]
pub struct EditSubCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditSubCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a subcategory.
pub async fn get_edit_subcategory_page(
    Path(subcategory_id): Path<EntryId>,
    State(state): State<EditSubCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subcategory = get_subcategory(subcategory_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve subcategory {subcategory_id}: {error}");
        }
    })?;
    let categories = get_all_entries(DictionaryKind::Category, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let update_endpoint = format_endpoint(endpoints::PUT_SUBCATEGORY, subcategory_id);
    let form = SubCategoryForm {
        method: FormMethod::Put,
        endpoint: &update_endpoint,
        name: subcategory.name.as_ref(),
        category_id: Some(subcategory.category_id),
        categories: &categories,
        errors: &SubCategoryFormErrors::default(),
    }
    .into_html();

    let edit_endpoint = format_endpoint(endpoints::EDIT_SUBCATEGORY_VIEW, subcategory_id);

    Ok(entry_page_view("Edit Subcategory", &edit_endpoint, &form).into_response())
}

/// Handle the subcategory editing form.
pub async fn update_subcategory_endpoint(
    Path(subcategory_id): Path<EntryId>,
    State(state): State<EditSubCategoryState>,
    Form(form_data): Form<SubCategoryFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let check = check_subcategory_form(&form_data, Some(subcategory_id), &connection);

    let (name, category_id) = match check {
        Ok(SubCategoryCheck::Valid { name, category_id }) => (name, category_id),
        Ok(SubCategoryCheck::Invalid(errors)) => {
            let categories = match get_all_entries(DictionaryKind::Category, &connection) {
                Ok(categories) => categories,
                Err(error) => {
                    tracing::error!("Failed to retrieve categories: {error}");
                    return error.into_alert_response();
                }
            };
            let update_endpoint = format_endpoint(endpoints::PUT_SUBCATEGORY, subcategory_id);

            return SubCategoryForm {
                method: FormMethod::Put,
                endpoint: &update_endpoint,
                name: &form_data.name,
                category_id: form_data.category_id,
                categories: &categories,
                errors: &errors,
            }
            .into_html()
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not validate subcategory {subcategory_id}: {error}");
            return error.into_alert_response();
        }
    };

    match update_subcategory(subcategory_id, name, category_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::UpdateMissingEntry(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating subcategory {subcategory_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
