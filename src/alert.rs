//! Alert messages that are swapped into the page's alert container by HTMX.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A dismissable message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// A success message with additional details.
    Success { message: String, details: String },
    /// An error message with additional details.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "p-4 mb-4 text-sm rounded-lg border text-green-800 bg-green-50 \
                border-green-300 dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm rounded-lg border text-red-800 bg-red-50 \
                border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                details,
            ),
        };

        html! {
            div role="alert" class=(container_style)
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
