//! Deletion confirmation page and endpoint for a single cash flow record.

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
    cash_flow::{
        CashFlowId, delete_cash_flow,
        query::{CashFlowListing, get_cash_flow_listing},
    },
    endpoints::{self, format_endpoint},
    html::{BUTTON_DANGER_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    notice::{Notice, set_notice},
};

/// The state needed for deleting a cash flow record.
#[derive(Debug, Clone)]
pub struct DeleteCashFlowState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCashFlowState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page asking the user to confirm deleting a cash flow record.
pub async fn get_delete_cash_flow_page(
    Path(cash_flow_id): Path<CashFlowId>,
    State(state): State<DeleteCashFlowState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let listing = get_cash_flow_listing(cash_flow_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve cash flow record {cash_flow_id}: {error}");
        }
    })?;

    Ok(confirm_delete_view(&listing).into_response())
}

/// Delete a cash flow record, then return to the cash flow list.
///
/// The outcome is reported with a notice on the cash flow list.
pub async fn delete_cash_flow_endpoint(
    Path(cash_flow_id): Path<CashFlowId>,
    State(state): State<DeleteCashFlowState>,
    jar: PrivateCookieJar,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => delete_cash_flow(cash_flow_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let notice = match result {
        Ok(()) => {
            tracing::info!("Deleted cash flow record {cash_flow_id}");
            Notice::Success("Cash flow record deleted".to_owned())
        }
        Err(Error::DeleteMissingCashFlow) => Notice::Error(
            "Could not delete cash flow record: it could not be found. \
            It may have already been deleted."
                .to_owned(),
        ),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting cash flow record {cash_flow_id}: {error}"
            );
            Notice::Error(
                "Could not delete cash flow record: an unexpected error occurred, \
                check the server logs for more details."
                    .to_owned(),
            )
        }
    };

    (
        set_notice(jar, &notice),
        HxRedirect(endpoints::CASH_FLOWS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn confirm_delete_view(listing: &CashFlowListing) -> Markup {
    let delete_endpoint = format_endpoint(endpoints::DELETE_CASH_FLOW, listing.id);
    let nav_bar = NavBar::new(endpoints::DELETE_CASH_FLOW_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Delete Cash Flow Record" }

            p class="mb-2" { "Are you sure you want to delete this record?" }

            dl id="cash-flow-summary" class="mb-4 grid grid-cols-2 gap-x-4 gap-y-1 text-sm"
            {
                dt class="font-semibold" { "Date" } dd { (listing.date) }
                dt class="font-semibold" { "Status" } dd { (listing.status) }
                dt class="font-semibold" { "Type" } dd { (listing.operation_type) }
                dt class="font-semibold" { "Category" }
                dd { (listing.category) " / " (listing.subcategory) }
                dt class="font-semibold" { "Amount" } dd { (listing.amount) }

                @if let Some(comment) = &listing.comment {
                    dt class="font-semibold" { "Comment" } dd { (comment) }
                }
            }

            form
                hx-post=(delete_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                button type="submit" class=(BUTTON_DANGER_STYLE) { "Delete" }
            }

            a href=(endpoints::CASH_FLOWS_VIEW) class={ (LINK_STYLE) " mt-4" } { "Cancel" }
        }
    };

    base("Delete Cash Flow Record", &[], &content)
}
