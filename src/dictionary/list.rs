//! The dictionaries page: every status, type, category and subcategory in one place.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dictionary::{DictionaryKind, EntryId, count_cash_flows_per_entry, get_all_entries},
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_links,
    },
    navigation::NavBar,
    notice::{notice_view, take_notice},
    subcategory::get_all_subcategory_listings,
};

/// The state needed for the dictionaries page.
#[derive(Debug, Clone)]
pub struct DictionariesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DictionariesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// One row in a dictionary table.
#[derive(Debug, Clone)]
struct DictionaryRow {
    name: String,
    /// Only set for subcategories.
    category_name: Option<String>,
    cash_flow_count: u32,
    edit_url: String,
    delete_url: String,
}

/// A dictionary and its rows.
#[derive(Debug, Clone)]
struct DictionarySection {
    kind: DictionaryKind,
    new_entry_url: String,
    rows: Vec<DictionaryRow>,
}

fn delete_url(kind: DictionaryKind, entry_id: EntryId) -> String {
    format_endpoint(
        &format_endpoint(endpoints::DELETE_DICTIONARY_ENTRY_VIEW, kind),
        entry_id,
    )
}

/// Render the dictionaries page along with any pending notice.
pub async fn get_dictionaries_page(
    State(state): State<DictionariesPageState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let mut sections = Vec::with_capacity(4);

    for kind in DictionaryKind::SIMPLE {
        let entries = get_all_entries(kind, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve {kind} entries: {error}"))?;
        let counts = count_cash_flows_per_entry(kind, &connection)
            .inspect_err(|error| tracing::error!("Could not count records per {kind}: {error}"))?;

        let rows = entries
            .into_iter()
            .map(|entry| DictionaryRow {
                name: entry.name.to_string(),
                category_name: None,
                cash_flow_count: *counts.get(&entry.id).unwrap_or(&0),
                edit_url: format_endpoint(
                    &format_endpoint(endpoints::EDIT_DICTIONARY_ENTRY_VIEW, kind),
                    entry.id,
                ),
                delete_url: delete_url(kind, entry.id),
            })
            .collect();

        sections.push(DictionarySection {
            kind,
            new_entry_url: format_endpoint(endpoints::NEW_DICTIONARY_ENTRY_VIEW, kind),
            rows,
        });
    }

    let subcategories = get_all_subcategory_listings(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve subcategories: {error}"))?;
    let counts = count_cash_flows_per_entry(DictionaryKind::SubCategory, &connection)
        .inspect_err(|error| tracing::error!("Could not count records per subcategory: {error}"))?;

    sections.push(DictionarySection {
        kind: DictionaryKind::SubCategory,
        new_entry_url: endpoints::NEW_SUBCATEGORY_VIEW.to_owned(),
        rows: subcategories
            .into_iter()
            .map(|listing| DictionaryRow {
                cash_flow_count: *counts.get(&listing.id).unwrap_or(&0),
                edit_url: format_endpoint(endpoints::EDIT_SUBCATEGORY_VIEW, listing.id),
                delete_url: delete_url(DictionaryKind::SubCategory, listing.id),
                name: listing.name.to_string(),
                category_name: Some(listing.category_name),
            })
            .collect(),
    });

    let (jar, notice) = take_notice(jar);

    Ok((jar, dictionaries_view(&sections, notice_view(notice))).into_response())
}

fn dictionaries_view(sections: &[DictionarySection], notice: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::DICTIONARIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (notice)

            h1 class="text-xl font-bold self-start lg:self-center" { "Dictionaries" }

            @for section in sections {
                (section_view(section))
            }
        }
    );

    base("Dictionaries", &[], &content)
}

fn section_view(section: &DictionarySection) -> Markup {
    let has_category = section.kind == DictionaryKind::SubCategory;
    let column_count = if has_category { 4 } else { 3 };

    html!(
        section
            id={ (section.kind) "-section" }
            class="w-full space-y-4 mt-8 dark:bg-gray-800 lg:max-w-5xl lg:mx-auto"
        {
            header class="flex justify-between flex-wrap items-end"
            {
                h2 class="text-lg font-semibold" { (section.kind.plural_label()) }

                a href=(section.new_entry_url) class=(LINK_STYLE)
                {
                    "Add " (section.kind.label())
                }
            }

            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        @if has_category {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Records" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for row in &section.rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (row.name) }
                            @if let Some(category_name) = &row.category_name {
                                td class=(TABLE_CELL_STYLE) { (category_name) }
                            }
                            td class=(TABLE_CELL_STYLE) { (row.cash_flow_count) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="flex gap-4"
                                {
                                    (edit_delete_links(&row.edit_url, &row.delete_url))
                                }
                            }
                        }
                    }

                    @if section.rows.is_empty() {
                        tr
                        {
                            td
                                colspan=(column_count)
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "Nothing here yet. "
                                a href=(section.new_entry_url) class=(LINK_STYLE)
                                {
                                    "Add the first one"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
