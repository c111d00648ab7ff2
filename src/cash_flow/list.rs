//! The cash flow list page: a filter form, a page of records and the pagination links.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    cash_flow::query::{ALL, CashFlowListing, CashFlowPage, ListFilters, ListQuery, list_cashflows},
    dictionary::{DictionaryEntry, DictionaryKind, get_all_entries},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_links,
    },
    navigation::NavBar,
    notice::{notice_view, take_notice},
    pagination::{PaginationConfig, create_pagination_indicators, pagination_view},
};

/// Comments longer than this many graphemes are cut short in the table.
const COMMENT_PREVIEW_LENGTH: usize = 40;

/// The state needed for the cash flow list page.
#[derive(Debug, Clone)]
pub struct CashFlowsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CashFlowsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The choices for the dropdown filters.
struct FilterOptions {
    statuses: Vec<DictionaryEntry>,
    types: Vec<DictionaryEntry>,
    categories: Vec<DictionaryEntry>,
}

/// Render the filtered, paginated cash flow list along with any pending notice.
pub async fn get_cash_flows_page(
    State(state): State<CashFlowsPageState>,
    Query(query): Query<ListQuery>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let filters = ListFilters::from_query(&query);
    let page = list_cashflows(
        &filters,
        query.page.as_deref(),
        state.pagination_config.default_page_size,
        &connection,
    )
    .inspect_err(|error| tracing::error!("Could not list cash flow records: {error}"))?;

    let options = FilterOptions {
        statuses: get_all_entries(DictionaryKind::Status, &connection)?,
        types: get_all_entries(DictionaryKind::Type, &connection)?,
        categories: get_all_entries(DictionaryKind::Category, &connection)?,
    };

    let (jar, notice) = take_notice(jar);
    let content = cash_flows_view(
        &query,
        &options,
        &page,
        state.pagination_config.max_pages,
        notice_view(notice),
    );

    Ok((jar, content).into_response())
}

/// The URL of `page` with the current filters kept.
fn page_url(query: &ListQuery, page: u64) -> String {
    let query = ListQuery {
        page: Some(page.to_string()),
        ..query.clone()
    };

    match serde_urlencoded::to_string(&query) {
        Ok(query_string) => format!("{}?{query_string}", endpoints::CASH_FLOWS_VIEW),
        Err(error) => {
            tracing::error!("Could not encode the cash flow filters {query:?}: {error}");
            format!("{}?page={page}", endpoints::CASH_FLOWS_VIEW)
        }
    }
}

fn comment_preview(comment: &str) -> String {
    if comment.graphemes(true).count() <= COMMENT_PREVIEW_LENGTH {
        return comment.to_owned();
    }

    let truncated: String = comment.graphemes(true).take(COMMENT_PREVIEW_LENGTH).collect();
    format!("{}...", truncated.trim_end())
}

fn cash_flows_view(
    query: &ListQuery,
    options: &FilterOptions,
    page: &CashFlowPage,
    max_pages: u64,
    notice: Markup,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CASH_FLOWS_VIEW).into_html();
    let indicators = create_pagination_indicators(page.page, page.page_count, max_pages);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (notice)

            section class="w-full space-y-4 lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Cash Flows" }

                    a href=(endpoints::NEW_CASH_FLOW_VIEW) class=(LINK_STYLE) { "New Record" }
                }

                (filter_form(query, options))

                p id="record-count" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (page.total) " records"
                }

                div class="overflow-x-auto"
                {
                    (cash_flow_table(&page.rows))
                }

                (pagination_view(&indicators, |page_number| page_url(query, page_number)))
            }
        }
    );

    base("Cash Flows", &[], &content)
}

fn filter_select(
    name: &str,
    label: &str,
    entries: &[DictionaryEntry],
    selected: Option<&str>,
) -> Markup {
    let selected = selected.map(str::trim).unwrap_or(ALL);

    html! {
        div
        {
            label for={ "filter-" (name) } class=(FORM_LABEL_STYLE) { (label) }

            select id={ "filter-" (name) } name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value=(ALL) selected[selected == ALL] { "All" }

                @for entry in entries {
                    @let value = entry.id.to_string();
                    option value=(value) selected[value == selected] { (entry.name) }
                }
            }
        }
    }
}

fn filter_form(query: &ListQuery, options: &FilterOptions) -> Markup {
    html! {
        form
            id="filters"
            method="get"
            action=(endpoints::CASH_FLOWS_VIEW)
            class="grid gap-4 sm:grid-cols-2 lg:grid-cols-6 items-end"
        {
            div
            {
                label for="date_from" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="date_from"
                    name="date_from"
                    type="date"
                    value=(query.date_from.as_deref().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date_to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="date_to"
                    name="date_to"
                    type="date"
                    value=(query.date_to.as_deref().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (filter_select("status", "Status", &options.statuses, query.status.as_deref()))
            (filter_select("type", "Type", &options.types, query.operation_type.as_deref()))
            (filter_select(
                "category",
                "Category",
                &options.categories,
                query.category.as_deref(),
            ))

            div class="flex gap-2"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
                a href=(endpoints::CASH_FLOWS_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Clear" }
            }
        }
    }
}

fn cash_flow_table(rows: &[CashFlowListing]) -> Markup {
    html! {
        table
            id="cash-flows"
            class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    @for heading in [
                        "Date", "Status", "Type", "Category", "Subcategory", "Amount",
                        "Comment", "Actions",
                    ] {
                        th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                    }
                }
            }

            tbody
            {
                @for row in rows {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (row.date) }
                        td class=(TABLE_CELL_STYLE) { span class=(BADGE_STYLE) { (row.status) } }
                        td class=(TABLE_CELL_STYLE) { (row.operation_type) }
                        td class=(TABLE_CELL_STYLE) { (row.category) }
                        td class=(TABLE_CELL_STYLE) { (row.subcategory) }
                        td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" } { (row.amount) }
                        td class=(TABLE_CELL_STYLE) title=[row.comment.as_deref()]
                        {
                            @if let Some(comment) = &row.comment {
                                (comment_preview(comment))
                            }
                        }
                        td class=(TABLE_CELL_STYLE)
                        {
                            div class="flex gap-4"
                            {
                                (edit_delete_links(
                                    &format_endpoint(endpoints::EDIT_CASH_FLOW_VIEW, row.id),
                                    &format_endpoint(endpoints::DELETE_CASH_FLOW_VIEW, row.id),
                                ))
                            }
                        }
                    }
                }

                @if rows.is_empty() {
                    tr
                    {
                        td colspan="8" class="px-6 py-4 text-center"
                        {
                            "No cash flow records match these filters."
                        }
                    }
                }
            }
        }
    }
}


#[cfg(test)]
mod cash_flows_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::{Html, Selector};
    use time::{Duration, macros::date};

    use crate::{
        cash_flow::{
            NewCashFlow,
            list::{CashFlowsPageState, get_cash_flows_page},
            query::ListQuery,
        },
        notice::{Notice, set_notice},
        pagination::PaginationConfig,
        test_utils::{
            TestDictionaries, assert_content_type, assert_valid_html, get_test_connection,
            insert_test_cash_flow, parse_html_document, test_cookie_jar,
        },
    };

    fn get_state(record_count: i64) -> (CashFlowsPageState, TestDictionaries) {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        for day in 0..record_count {
            insert_test_cash_flow(
                &connection,
                &NewCashFlow {
                    date: date!(2023 - 01 - 01) + Duration::days(day),
                    ..dictionaries.new_cash_flow()
                },
            );
        }

        let state = CashFlowsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        };

        (state, dictionaries)
    }

    fn table_dates(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("#cash-flows tbody tr td:first-child").unwrap())
            .map(|cell| cell.text().collect::<String>())
            .collect()
    }

    fn input_value(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matching {selector}"))
            .value()
            .attr("value")
            .unwrap_or_default()
            .to_owned()
    }

    #[tokio::test]
    async fn renders_records_newest_first() {
        let (state, _) = get_state(3);

        let response = get_cash_flows_page(
            State(state),
            Query(ListQuery::default()),
            test_cookie_jar(),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            table_dates(&html),
            vec!["2023-01-03", "2023-01-02", "2023-01-01"]
        );
    }

    #[tokio::test]
    async fn applies_and_echoes_filters() {
        let (state, dictionaries) = get_state(31);
        let query = ListQuery {
            date_from: Some("2023-01-10".to_owned()),
            date_to: Some("2023-01-12".to_owned()),
            status: Some(dictionaries.business.to_string()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), test_cookie_jar())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        assert_eq!(
            table_dates(&html),
            vec!["2023-01-12", "2023-01-11", "2023-01-10"]
        );
        assert_eq!(input_value(&html, "#date_from"), "2023-01-10");
        assert_eq!(input_value(&html, "#date_to"), "2023-01-12");
        let selected_type = html
            .select(&Selector::parse("#filter-type option[selected]").unwrap())
            .next()
            .expect("No selected type")
            .value()
            .attr("value")
            .unwrap_or_default()
            .to_owned();
        assert_eq!(selected_type, "all");
    }

    #[tokio::test]
    async fn malformed_date_is_ignored_but_echoed() {
        let (state, _) = get_state(5);
        let query = ListQuery {
            date_from: Some("not-a-date".to_owned()),
            date_to: Some("2023-01-02".to_owned()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), test_cookie_jar())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        assert_eq!(table_dates(&html).len(), 5);
        assert_eq!(input_value(&html, "#date_from"), "not-a-date");
    }

    #[tokio::test]
    async fn pagination_links_keep_filters() {
        let (state, dictionaries) = get_state(25);
        let query = ListQuery {
            category: Some(dictionaries.marketing.to_string()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), test_cookie_jar())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        let next = html
            .select(&Selector::parse("nav.pagination a[rel=next]").unwrap())
            .next()
            .expect("No next page link")
            .value()
            .attr("href")
            .unwrap_or_default()
            .to_owned();
        assert_eq!(
            next,
            format!("/?category={}&page=2", dictionaries.marketing)
        );
        assert_eq!(table_dates(&html).len(), 20);
    }

    #[tokio::test]
    async fn shows_pending_notice() {
        let (state, _) = get_state(0);
        let jar = set_notice(
            test_cookie_jar(),
            &Notice::Success("Cash flow record deleted".to_owned()),
        );

        let response = get_cash_flows_page(State(state), Query(ListQuery::default()), jar)
            .await
            .into_response();

        let html = parse_html_document(response).await;
        let notice = html
            .select(&Selector::parse("#notice").unwrap())
            .next()
            .expect("No notice found")
            .text()
            .collect::<String>();
        assert!(notice.contains("Cash flow record deleted"));
    }
}
