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
    cash_flow::{
        create_cash_flow,
        form::{
            CashFlowCheck, CashFlowForm, CashFlowFormData, CashFlowFormErrors,
            CashFlowFormOptions, cash_flow_page_view, check_cash_flow_form,
        },
    },
    dictionary::form::FormMethod,
    endpoints,
    timezone::local_today,
};

/// The state needed for creating a cash flow record.
#[derive(Debug, Clone)]
pub struct CreateCashFlowState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateCashFlowState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for creating a cash flow record, with the date set to today.
pub async fn get_new_cash_flow_page(
    State(state): State<CreateCashFlowState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("Could not get today's date: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let values = CashFlowFormData {
        date: today.to_string(),
        ..Default::default()
    };
    let options = CashFlowFormOptions::load(&values, &connection)
        .inspect_err(|error| tracing::error!("Failed to load the form options: {error}"))?;

    let form = CashFlowForm {
        method: FormMethod::Post,
        endpoint: endpoints::POST_CASH_FLOW,
        values: &values,
        options: &options,
        errors: &CashFlowFormErrors::default(),
    }
    .into_html();

    Ok(cash_flow_page_view("New Cash Flow Record", endpoints::NEW_CASH_FLOW_VIEW, &form)
        .into_response())
}

/// Handle the cash flow creation form.
///
/// An invalid form is sent back with the entered values and an error under each bad field.
pub async fn create_cash_flow_endpoint(
    State(state): State<CreateCashFlowState>,
    Form(form_data): Form<CashFlowFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_cash_flow = match check_cash_flow_form(&form_data, &connection) {
        Ok(CashFlowCheck::Valid(new_cash_flow)) => new_cash_flow,
        Ok(CashFlowCheck::Invalid(errors)) => {
            let options = match CashFlowFormOptions::load(&form_data, &connection) {
                Ok(options) => options,
                Err(error) => {
                    tracing::error!("Failed to load the form options: {error}");
                    return error.into_alert_response();
                }
            };

            return CashFlowForm {
                method: FormMethod::Post,
                endpoint: endpoints::POST_CASH_FLOW,
                values: &form_data,
                options: &options,
                errors: &errors,
            }
            .into_html()
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not validate the new cash flow record: {error}");
            return error.into_alert_response();
        }
    };

    match create_cash_flow(&new_cash_flow, &connection) {
        Ok(cash_flow) => {
            tracing::debug!("Created cash flow record {}", cash_flow.id);

            (
                HxRedirect(endpoints::CASH_FLOWS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while creating a cash flow record: {error}"
            );

            error.into_alert_response()
        }
    }
}
