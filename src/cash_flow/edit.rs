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
    cash_flow::{
        CashFlowId,
        form::{
            CashFlowCheck, CashFlowForm, CashFlowFormData, CashFlowFormErrors,
            CashFlowFormOptions, cash_flow_page_view, check_cash_flow_form,
        },
        get_cash_flow, update_cash_flow,
    },
    dictionary::form::FormMethod,
    endpoints::{self, format_endpoint},
};

/// The state needed for the edit cash flow page and endpoint.
#[derive(Debug, Clone)]
pub struct EditCashFlowState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCashFlowState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a cash flow record.
pub async fn get_edit_cash_flow_page(
    Path(cash_flow_id): Path<CashFlowId>,
    State(state): State<EditCashFlowState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let cash_flow = get_cash_flow(cash_flow_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve cash flow record {cash_flow_id}: {error}");
        }
    })?;

    let values = CashFlowFormData::from_cash_flow(&cash_flow);
    let options = CashFlowFormOptions::load(&values, &connection)
        .inspect_err(|error| tracing::error!("Failed to load the form options: {error}"))?;
    let edit_endpoint = format_endpoint(endpoints::EDIT_CASH_FLOW_VIEW, cash_flow_id);
    let update_endpoint = format_endpoint(endpoints::PUT_CASH_FLOW, cash_flow_id);

    let form = CashFlowForm {
        method: FormMethod::Put,
        endpoint: &update_endpoint,
        values: &values,
        options: &options,
        errors: &CashFlowFormErrors::default(),
    }
    .into_html();

    Ok(cash_flow_page_view("Edit Cash Flow Record", &edit_endpoint, &form).into_response())
}

/// Handle the cash flow editing form.
pub async fn update_cash_flow_endpoint(
    Path(cash_flow_id): Path<CashFlowId>,
    State(state): State<EditCashFlowState>,
    Form(form_data): Form<CashFlowFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update_endpoint = format_endpoint(endpoints::PUT_CASH_FLOW, cash_flow_id);

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
                method: FormMethod::Put,
                endpoint: &update_endpoint,
                values: &form_data,
                options: &options,
                errors: &errors,
            }
            .into_html()
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not validate cash flow record {cash_flow_id}: {error}");
            return error.into_alert_response();
        }
    };

    match update_cash_flow(cash_flow_id, &new_cash_flow, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CASH_FLOWS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::UpdateMissingCashFlow) => error.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating cash flow record {cash_flow_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
