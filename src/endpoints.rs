//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/cash_flows/{cash_flow_id}/edit', use [format_endpoint].

/// The page listing cash flow records with filters and pagination.
pub const CASH_FLOWS_VIEW: &str = "/";
/// The page for creating a new cash flow record.
pub const NEW_CASH_FLOW_VIEW: &str = "/cash_flows/new";
/// The page for editing an existing cash flow record.
pub const EDIT_CASH_FLOW_VIEW: &str = "/cash_flows/{cash_flow_id}/edit";
/// The page for confirming the deletion of a cash flow record.
pub const DELETE_CASH_FLOW_VIEW: &str = "/cash_flows/{cash_flow_id}/delete";
/// The page listing the statuses, types, categories and subcategories.
pub const DICTIONARIES_VIEW: &str = "/dictionaries";
/// The page for creating a new status, type or category.
pub const NEW_DICTIONARY_ENTRY_VIEW: &str = "/dictionaries/{kind}/new";
/// The page for editing a status, type or category.
pub const EDIT_DICTIONARY_ENTRY_VIEW: &str = "/dictionaries/{kind}/{entry_id}/edit";
/// The page for confirming the deletion of any dictionary entry, subcategories included.
pub const DELETE_DICTIONARY_ENTRY_VIEW: &str = "/dictionaries/{kind}/{entry_id}/delete";
/// The page for creating a new subcategory.
pub const NEW_SUBCATEGORY_VIEW: &str = "/subcategories/new";
/// The page for editing an existing subcategory.
pub const EDIT_SUBCATEGORY_VIEW: &str = "/subcategories/{subcategory_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a cash flow record.
pub const POST_CASH_FLOW: &str = "/api/cash_flows";
/// The route to update a cash flow record.
pub const PUT_CASH_FLOW: &str = "/api/cash_flows/{cash_flow_id}";
/// The route to delete a cash flow record.
pub const DELETE_CASH_FLOW: &str = "/api/cash_flows/{cash_flow_id}/delete";
/// The route to create a status, type or category.
pub const POST_DICTIONARY_ENTRY: &str = "/api/dictionaries/{kind}";
/// The route to update a status, type or category.
pub const PUT_DICTIONARY_ENTRY: &str = "/api/dictionaries/{kind}/{entry_id}";
/// The route to delete a dictionary entry along with everything that references it.
pub const DELETE_DICTIONARY_ENTRY: &str = "/api/dictionaries/{kind}/{entry_id}/delete";
/// The route to create a subcategory (POST) or list the subcategories of a category as JSON (GET).
pub const SUBCATEGORIES_API: &str = "/api/subcategories";
/// The route to update a subcategory.
pub const PUT_SUBCATEGORY: &str = "/api/subcategories/{subcategory_id}";

/// Replace the first parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/cash_flows/{cash_flow_id}', '{cash_flow_id}' is the parameter.
///
/// Paths with more than one parameter are filled in by calling this function
/// once per parameter, from left to right.
///
/// This function assumes that an endpoint path only contains ASCII characters.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl std::fmt::Display) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
