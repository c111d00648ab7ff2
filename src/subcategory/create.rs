use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dictionary::{DictionaryKind, form::FormMethod, form::entry_page_view, get_all_entries},
    endpoints,
    subcategory::{
        SubCategoryFormData, create_subcategory,
        form::{SubCategoryCheck, SubCategoryForm, SubCategoryFormErrors, check_subcategory_form},
    },
};

/// The state needed for creating a subcategory.
#[derive(Debug, Clone)]
pub struct CreateSubCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSubCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for creating a subcategory.
pub async fn get_new_subcategory_page(
    State(state): State<CreateSubCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_entries(DictionaryKind::Category, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let form = SubCategoryForm {
        method: FormMethod::Post,
        endpoint: endpoints::SUBCATEGORIES_API,
        name: "",
        category_id: None,
        categories: &categories,
        errors: &SubCategoryFormErrors::default(),
    }
    .into_html();

    Ok(entry_page_view("Create Subcategory", endpoints::NEW_SUBCATEGORY_VIEW, &form).into_response())
}

/// Handle the subcategory creation form.
pub async fn create_subcategory_endpoint(
    State(state): State<CreateSubCategoryState>,
    Form(form_data): Form<SubCategoryFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let (name, category_id) = match check_subcategory_form(&form_data, None, &connection) {
        Ok(SubCategoryCheck::Valid { name, category_id }) => (name, category_id),
        Ok(SubCategoryCheck::Invalid(errors)) => {
            let categories = match get_all_entries(DictionaryKind::Category, &connection) {
                Ok(categories) => categories,
                Err(error) => {
                    tracing::error!("Failed to retrieve categories: {error}");
                    return error.into_alert_response();
                }
            };

            return SubCategoryForm {
                method: FormMethod::Post,
                endpoint: endpoints::SUBCATEGORIES_API,
                name: &form_data.name,
                category_id: form_data.category_id,
                categories: &categories,
                errors: &errors,
            }
            .into_html()
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not validate the new subcategory: {error}");
            return error.into_alert_response();
        }
    };

    match create_subcategory(name, category_id, &connection) {
        Ok(subcategory) => {
            tracing::debug!("Created subcategory {}", subcategory.id);

            (
                HxRedirect(endpoints::DICTIONARIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a subcategory: {error}");

            error.into_alert_response()
        }
    }
}
