//! The JSON endpoint behind the dependent subcategory dropdown.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    subcategory::{SubCategoryOption, list_subcategories},
};

/// The state needed for looking up subcategories.
#[derive(Debug, Clone)]
pub struct SubCategoryLookupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SubCategoryLookupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for a subcategory lookup.
///
/// The category ID is kept as a string so that junk input falls back to an
/// empty list instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SubCategoryQuery {
    pub category_id: Option<String>,
}

/// Return the subcategories of the requested category as a JSON array of `{id, name}`.
///
/// A missing, malformed or unknown category gives an empty array.
pub async fn get_subcategories_endpoint(
    State(state): State<SubCategoryLookupState>,
    Query(query): Query<SubCategoryQuery>,
) -> Response {
    let category_id = query
        .category_id
        .and_then(|category_id| category_id.trim().parse().ok());

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Vec::<SubCategoryOption>::new()),
            )
                .into_response();
        }
    };

    match list_subcategories(category_id, &connection) {
        Ok(subcategories) => Json(subcategories).into_response(),
        Err(error) => {
            tracing::error!("Could not list subcategories of category {category_id:?}: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Vec::<SubCategoryOption>::new()),
            )
                .into_response()
        }
    }
}
