//! Filtering and paging the cash flow list.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    cash_flow::{Amount, CashFlowId, form::parse_date},
    dictionary::EntryId,
    pagination::{page_count, resolve_page},
};

/// The value of a dropdown filter that means "do not filter".
pub const ALL: &str = "all";

/// The raw query string of the cash flow list.
///
/// Every field is kept as the client sent it so the filter form can echo it back.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// The filters that actually apply to the cash flow list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListFilters {
    /// Inclusive on both ends.
    pub date_range: Option<(Date, Date)>,
    pub status_id: Option<EntryId>,
    pub type_id: Option<EntryId>,
    pub category_id: Option<EntryId>,
}

impl ListFilters {
    /// Work out which filters apply from the raw query.
    ///
    /// The date range applies only when both ends are valid dates, otherwise it
    /// is dropped entirely. A dropdown filter applies only when it holds an ID.
    pub fn from_query(query: &ListQuery) -> Self {
        let date_from = query.date_from.as_deref().and_then(parse_date);
        let date_to = query.date_to.as_deref().and_then(parse_date);

        Self {
            date_range: date_from.zip(date_to),
            status_id: parse_id_filter(query.status.as_deref()),
            type_id: parse_id_filter(query.operation_type.as_deref()),
            category_id: parse_id_filter(query.category.as_deref()),
        }
    }

    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some((date_from, date_to)) = self.date_range {
            conditions.push("cash_flow.date BETWEEN ? AND ?");
            params.push(Value::Text(date_from.to_string()));
            params.push(Value::Text(date_to.to_string()));
        }

        for (column, entry_id) in [
            ("cash_flow.status_id = ?", self.status_id),
            ("cash_flow.type_id = ?", self.type_id),
            ("cash_flow.category_id = ?", self.category_id),
        ] {
            if let Some(entry_id) = entry_id {
                conditions.push(column);
                params.push(Value::Integer(entry_id));
            }
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

fn parse_id_filter(raw: Option<&str>) -> Option<EntryId> {
    raw.map(str::trim)
        .filter(|raw| !raw.eq_ignore_ascii_case(ALL))
        .and_then(|raw| raw.parse().ok())
}

/// A cash flow record with the names of its dictionary entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowListing {
    pub id: CashFlowId,
    pub date: Date,
    pub status: String,
    pub operation_type: String,
    pub category: String,
    pub subcategory: String,
    pub amount: Amount,
    pub comment: Option<String>,
}

const LISTING_SELECT: &str = "SELECT cash_flow.id, cash_flow.date, status.name, \
        operation_type.name, category.name, subcategory.name, cash_flow.amount, cash_flow.comment
     FROM cash_flow
     INNER JOIN status ON status.id = cash_flow.status_id
     INNER JOIN operation_type ON operation_type.id = cash_flow.type_id
     INNER JOIN category ON category.id = cash_flow.category_id
     INNER JOIN subcategory ON subcategory.id = cash_flow.subcategory_id";

/// One page of the cash flow list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowPage {
    pub rows: Vec<CashFlowListing>,
    /// The page shown, after clamping to the pages that exist.
    pub page: u64,
    pub page_count: u64,
    /// The number of records matching the filters across all pages.
    pub total: u64,
}

/// Get the page `page` of the records matching `filters`, newest first.
///
/// A missing, invalid or zero page number gives the first page and a page
/// past the end gives the last page.
pub fn list_cashflows(
    filters: &ListFilters,
    page: Option<&str>,
    page_size: u64,
    connection: &Connection,
) -> Result<CashFlowPage, Error> {
    let (where_clause, mut params) = filters.where_clause();

    let total: i64 = connection.query_row(
        &format!("SELECT COUNT(cash_flow.id) FROM cash_flow {where_clause}"),
        params_from_iter(params.iter()),
        |row| row.get(0),
    )?;
    let total = total as u64;

    let page_size = page_size.max(1);
    let page_count = page_count(total, page_size);
    let page = resolve_page(page, 1, page_count);

    params.push(Value::Integer(page_size as i64));
    params.push(Value::Integer(((page - 1) * page_size) as i64));

    let rows = connection
        .prepare(&format!(
            "{LISTING_SELECT}
             {where_clause}
             ORDER BY cash_flow.date DESC, cash_flow.id DESC
             LIMIT ? OFFSET ?"
        ))?
        .query_map(params_from_iter(params.iter()), map_listing_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CashFlowPage {
        rows,
        page,
        page_count,
        total,
    })
}

/// Get a single cash flow record with the names of its dictionary entries.
pub fn get_cash_flow_listing(
    id: CashFlowId,
    connection: &Connection,
) -> Result<CashFlowListing, Error> {
    connection
        .query_row(
            &format!("{LISTING_SELECT} WHERE cash_flow.id = ?1"),
            [id],
            map_listing_row,
        )
        .map_err(Error::from)
}

fn map_listing_row(row: &Row) -> Result<CashFlowListing, rusqlite::Error> {
    Ok(CashFlowListing {
        id: row.get(0)?,
        date: row.get(1)?,
        status: row.get(2)?,
        operation_type: row.get(3)?,
        category: row.get(4)?,
        subcategory: row.get(5)?,
        amount: row.get(6)?,
        comment: row.get(7)?,
    })
}
