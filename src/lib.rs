//! Cash flow tracker is a web app for recording income and expenses against a
//! small set of lookup dictionaries: statuses, types, categories and
//! subcategories.
//!
//! This library provides a REST API that directly serves HTML pages, plus a
//! JSON endpoint for populating the subcategory dropdown.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod cash_flow;
mod db;
mod dictionary;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod notice;
mod pagination;
mod routing;
mod subcategory;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{
    alert::Alert, dictionary::DictionaryKind, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string (or only whitespace) was used as a dictionary entry name.
    #[error("Name cannot be empty")]
    EmptyName,

    /// A dictionary entry name was longer than the allowed number of characters.
    #[error("Name cannot be longer than {0} characters")]
    NameTooLong(usize),

    /// Another entry in the same dictionary already has this name, ignoring case.
    #[error("A {0} named \"{1}\" already exists")]
    DuplicateName(DictionaryKind, String),

    /// The selected category already has a subcategory with this name, ignoring case.
    #[error("A subcategory named \"{0}\" already exists in the selected category")]
    DuplicateSubCategory(String),

    /// The amount could not be parsed as a number.
    #[error("Enter a valid amount, e.g. 1234.56")]
    InvalidAmount,

    /// The amount has more decimal places than can be stored.
    #[error("Amount cannot have more than {0} decimal places")]
    AmountTooPrecise(u32),

    /// The amount has more digits than can be stored.
    #[error("Amount cannot have more than {0} digits")]
    AmountTooLarge(u32),

    /// A cash flow record was saved with a subcategory from another category.
    #[error("Select a valid subcategory for the chosen category.")]
    SubCategoryNotInCategory,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Tried to update a dictionary entry that does not exist
    #[error("tried to update a {0} that is not in the database")]
    UpdateMissingEntry(DictionaryKind),

    /// Tried to delete a dictionary entry that does not exist
    #[error("tried to delete a {0} that is not in the database")]
    DeleteMissingEntry(DictionaryKind),

    /// Tried to update a cash flow record that does not exist
    #[error("tried to update a cash flow record that is not in the database")]
    UpdateMissingCashFlow,

    /// Tried to delete a cash flow record that does not exist
    #[error("tried to delete a cash flow record that is not in the database")]
    DeleteMissingCashFlow,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for HTMX requests.
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested item could not be found. \
                        Try refreshing the page to see if it has been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingEntry(kind) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: format!("Could not update {kind}"),
                    details: format!("The {kind} could not be found."),
                },
            ),
            Error::DeleteMissingEntry(kind) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: format!("Could not delete {kind}"),
                    details: format!(
                        "The {kind} could not be found. \
                        Try refreshing the page to see if it has already been deleted."
                    ),
                },
            ),
            Error::UpdateMissingCashFlow => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update cash flow record".to_owned(),
                    details: "The cash flow record could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingCashFlow => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete cash flow record".to_owned(),
                    details: "The cash flow record could not be found. \
                        Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::SubCategoryNotInCategory => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Could not save cash flow record".to_owned(),
                    details: Error::SubCategoryNotInCategory.to_string(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
