//! Application router configuration.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    cash_flow::{
        create_cash_flow_endpoint, delete_cash_flow_endpoint, get_cash_flows_page,
        get_delete_cash_flow_page, get_edit_cash_flow_page, get_new_cash_flow_page,
        update_cash_flow_endpoint,
    },
    dictionary::{
        create_entry_endpoint, delete_entry_endpoint, get_delete_entry_page,
        get_dictionaries_page, get_edit_entry_page, get_new_entry_page, update_entry_endpoint,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    subcategory::{
        create_subcategory_endpoint, get_edit_subcategory_page, get_new_subcategory_page,
        get_subcategories_endpoint, update_subcategory_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::CASH_FLOWS_VIEW, get(get_cash_flows_page))
        .route(endpoints::NEW_CASH_FLOW_VIEW, get(get_new_cash_flow_page))
        .route(endpoints::EDIT_CASH_FLOW_VIEW, get(get_edit_cash_flow_page))
        .route(
            endpoints::DELETE_CASH_FLOW_VIEW,
            get(get_delete_cash_flow_page),
        )
        .route(endpoints::DICTIONARIES_VIEW, get(get_dictionaries_page))
        .route(endpoints::NEW_DICTIONARY_ENTRY_VIEW, get(get_new_entry_page))
        .route(
            endpoints::EDIT_DICTIONARY_ENTRY_VIEW,
            get(get_edit_entry_page),
        )
        .route(
            endpoints::DELETE_DICTIONARY_ENTRY_VIEW,
            get(get_delete_entry_page),
        )
        .route(endpoints::NEW_SUBCATEGORY_VIEW, get(get_new_subcategory_page))
        .route(
            endpoints::EDIT_SUBCATEGORY_VIEW,
            get(get_edit_subcategory_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // These routes are called by HTMX and answer with HX-Redirect or HTML fragments.
    let api_routes = Router::new()
        .route(endpoints::POST_CASH_FLOW, post(create_cash_flow_endpoint))
        .route(endpoints::PUT_CASH_FLOW, put(update_cash_flow_endpoint))
        .route(endpoints::DELETE_CASH_FLOW, post(delete_cash_flow_endpoint))
        .route(endpoints::POST_DICTIONARY_ENTRY, post(create_entry_endpoint))
        .route(endpoints::PUT_DICTIONARY_ENTRY, put(update_entry_endpoint))
        .route(
            endpoints::DELETE_DICTIONARY_ENTRY,
            post(delete_entry_endpoint),
        )
        .route(
            endpoints::SUBCATEGORIES_API,
            get(get_subcategories_endpoint).post(create_subcategory_endpoint),
        )
        .route(endpoints::PUT_SUBCATEGORY, put(update_subcategory_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        AppState,
        cash_flow::form::CashFlowFormData,
        endpoints::{self, format_endpoint},
        pagination::PaginationConfig,
        routing::build_router,
        subcategory::SubCategoryOption,
        test_utils::TestDictionaries,
    };

    fn get_test_server() -> (TestServer, TestDictionaries) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "a super secret key for testing",
            "Etc/UTC",
            PaginationConfig::default(),
        )
        .unwrap();
        let dictionaries = TestDictionaries::seed(&state.db_connection.lock().unwrap());
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        (server, dictionaries)
    }

    fn cash_flow_form(dictionaries: &TestDictionaries) -> CashFlowFormData {
        CashFlowFormData {
            date: "2024-06-01".to_owned(),
            status: dictionaries.business.to_string(),
            operation_type: dictionaries.income.to_string(),
            category: dictionaries.marketing.to_string(),
            subcategory: dictionaries.farpost.to_string(),
            amount: "320.10".to_owned(),
            comment: "Invoice 17".to_owned(),
        }
    }

    fn table_rows(html: &Html) -> Vec<Vec<String>> {
        let row_selector = Selector::parse("#cash-flows tbody tr").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        html.select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .collect()
            })
            .collect()
    }

    #[tokio::test]
    async fn pages_render() {
        let (server, dictionaries) = get_test_server();

        for path in [
            endpoints::CASH_FLOWS_VIEW.to_owned(),
            endpoints::NEW_CASH_FLOW_VIEW.to_owned(),
            endpoints::DICTIONARIES_VIEW.to_owned(),
            format_endpoint(endpoints::NEW_DICTIONARY_ENTRY_VIEW, "status"),
            endpoints::NEW_SUBCATEGORY_VIEW.to_owned(),
            format_endpoint(endpoints::EDIT_SUBCATEGORY_VIEW, dictionaries.avito),
            format_endpoint(
                &format_endpoint(endpoints::DELETE_DICTIONARY_ENTRY_VIEW, "category"),
                dictionaries.marketing,
            ),
        ] {
            let response = server.get(&path).await;

            assert_eq!(response.status_code(), StatusCode::OK, "GET {path}");
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (server, _) = get_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn subcategory_lookup_returns_json() {
        let (server, dictionaries) = get_test_server();

        let response = server
            .get(endpoints::SUBCATEGORIES_API)
            .add_query_param("category_id", dictionaries.infrastructure)
            .await;

        response.assert_status_ok();
        let options = response.json::<Vec<SubCategoryOption>>();
        assert_eq!(
            options,
            vec![SubCategoryOption {
                id: dictionaries.hosting,
                name: "Hosting".to_owned(),
            }]
        );
    }

    #[tokio::test]
    async fn cash_flow_lifecycle() {
        let (server, dictionaries) = get_test_server();

        let response = server
            .post(endpoints::POST_CASH_FLOW)
            .form(&cash_flow_form(&dictionaries))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::CASH_FLOWS_VIEW);

        let html = Html::parse_document(&server.get(endpoints::CASH_FLOWS_VIEW).await.text());
        assert_eq!(
            table_rows(&html),
            vec![vec![
                "2024-06-01",
                "Business",
                "Income",
                "Marketing",
                "Farpost",
                "320.10",
                "Invoice 17",
                "EditDelete",
            ]]
        );

        let response = server
            .put(&format_endpoint(endpoints::PUT_CASH_FLOW, 1))
            .form(&CashFlowFormData {
                amount: "-5".to_owned(),
                ..cash_flow_form(&dictionaries)
            })
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        let html = Html::parse_document(&server.get(endpoints::CASH_FLOWS_VIEW).await.text());
        assert_eq!(table_rows(&html)[0][5], "-5.00");

        let response = server
            .post(&format_endpoint(endpoints::DELETE_CASH_FLOW, 1))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        let notice_cookie = response.cookie("notice");

        let html = Html::parse_document(
            &server
                .get(endpoints::CASH_FLOWS_VIEW)
                .add_cookie(notice_cookie)
                .await
                .text(),
        );
        let notice = html
            .select(&Selector::parse("#notice").unwrap())
            .next()
            .expect("No notice shown after deleting")
            .text()
            .collect::<String>();
        assert!(notice.contains("Cash flow record deleted"));
        assert_eq!(
            table_rows(&html),
            vec![vec!["No cash flow records match these filters."]]
        );
    }

    #[tokio::test]
    async fn deleting_category_cascades_to_records() {
        let (server, dictionaries) = get_test_server();
        server
            .post(endpoints::POST_CASH_FLOW)
            .form(&cash_flow_form(&dictionaries))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server
            .post(&format_endpoint(
                &format_endpoint(endpoints::DELETE_DICTIONARY_ENTRY, "category"),
                dictionaries.marketing,
            ))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::DICTIONARIES_VIEW);

        let html = Html::parse_document(&server.get(endpoints::CASH_FLOWS_VIEW).await.text());
        assert_eq!(
            table_rows(&html),
            vec![vec!["No cash flow records match these filters."]]
        );
        let response = server
            .get(endpoints::SUBCATEGORIES_API)
            .add_query_param("category_id", dictionaries.marketing)
            .await;
        assert!(response.json::<Vec<SubCategoryOption>>().is_empty());
    }

    #[tokio::test]
    async fn cash_flow_form_reads_type_field() {
        let body = "date=2024-06-01&status=1&type=2&category=3&subcategory=4&amount=10&comment=";

        let form: CashFlowFormData = serde_html_form::from_str(body).unwrap();

        assert_eq!(form.operation_type, "2");
        assert_eq!(form.comment, "");
    }
}
