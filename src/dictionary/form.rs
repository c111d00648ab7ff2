//! The name form shared by the create and edit pages for statuses, types and categories.

use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error,
    dictionary::{DictionaryKind, EntryId, EntryName, MAX_NAME_LENGTH, validate_unique_name},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// How the form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormMethod {
    Post,
    Put,
}

/// The outcome of checking a submitted name.
pub(crate) enum NameCheck {
    Valid(EntryName),
    /// The name is unusable, with the message to show next to the field.
    Invalid(String),
}

/// Parse `raw_name` and check it is not already used in the dictionary `kind`.
///
/// `excluding_id` is the entry being edited, if any.
pub(crate) fn check_entry_name(
    kind: DictionaryKind,
    raw_name: &str,
    excluding_id: Option<EntryId>,
    connection: &Connection,
) -> Result<NameCheck, Error> {
    let name = match EntryName::new(raw_name) {
        Ok(name) => name,
        Err(error) => return Ok(NameCheck::Invalid(format!("Error: {error}"))),
    };

    match validate_unique_name(kind, &name, excluding_id, connection) {
        Ok(()) => Ok(NameCheck::Valid(name)),
        Err(error @ Error::DuplicateName(..)) => Ok(NameCheck::Invalid(format!("Error: {error}"))),
        Err(error) => Err(error),
    }
}

pub(crate) fn entry_page_view(title: &str, active_endpoint: &str, form: &Markup) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { (title) }
            (form)
        }
    };

    base(title, &[], &content)
}

pub(crate) fn entry_form_view(
    kind: DictionaryKind,
    method: FormMethod,
    endpoint: &str,
    name: &str,
    error_message: &str,
) -> Markup {
    let submit_label = match method {
        FormMethod::Post => format!("Create {}", kind.label()),
        FormMethod::Put => format!("Update {}", kind.label()),
    };
    let label = format!("{} Name", kind.label());

    html! {
        form
            hx-post=[(method == FormMethod::Post).then_some(endpoint)]
            hx-put=[(method == FormMethod::Put).then_some(endpoint)]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    (label)
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder=(label)
                    value=(name)
                    maxlength=(MAX_NAME_LENGTH)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
