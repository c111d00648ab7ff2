//! Defines the core data models and database queries for cash flow records.

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{Error, cash_flow::Amount, dictionary::EntryId};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a cash flow record.
pub type CashFlowId = i64;

/// A single income or expense, classified by the four dictionaries.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlow {
    pub id: CashFlowId,
    /// When the money moved.
    pub date: Date,
    pub status_id: EntryId,
    pub type_id: EntryId,
    pub category_id: EntryId,
    /// Always a subcategory of `category_id` at the time the record was saved.
    pub subcategory_id: EntryId,
    pub amount: Amount,
    pub comment: Option<String>,
    /// When the record was created, in UTC.
    pub created_at: OffsetDateTime,
    /// When the record was last saved, in UTC.
    pub updated_at: OffsetDateTime,
}

/// The user-editable fields of a cash flow record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCashFlow {
    pub date: Date,
    pub status_id: EntryId,
    pub type_id: EntryId,
    pub category_id: EntryId,
    pub subcategory_id: EntryId,
    pub amount: Amount,
    /// `None` when the user left the comment blank.
    pub comment: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const CASH_FLOW_COLUMNS: &str = "id, date, status_id, type_id, category_id, subcategory_id, \
    amount, comment, created_at, updated_at";

/// Check that the subcategory `subcategory_id` belongs to the category `category_id`.
///
/// # Errors
/// Returns [Error::SubCategoryNotInCategory] if it does not, or the subcategory does not exist.
pub fn ensure_subcategory_in_category(
    category_id: EntryId,
    subcategory_id: EntryId,
    connection: &Connection,
) -> Result<(), Error> {
    let is_child: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM subcategory WHERE id = ?1 AND category_id = ?2)",
        (subcategory_id, category_id),
        |row| row.get(0),
    )?;

    if is_child {
        Ok(())
    } else {
        Err(Error::SubCategoryNotInCategory)
    }
}

/// Create a cash flow record.
///
/// # Errors
/// This function will return a:
/// - [Error::SubCategoryNotInCategory] if the subcategory belongs to another category,
/// - or [Error::SqlError] if a referenced dictionary entry does not exist or there is some
///   other SQL error.
pub fn create_cash_flow(
    cash_flow: &NewCashFlow,
    connection: &Connection,
) -> Result<CashFlow, Error> {
    ensure_subcategory_in_category(cash_flow.category_id, cash_flow.subcategory_id, connection)?;

    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO cash_flow (date, status_id, type_id, category_id, subcategory_id, \
                amount, comment, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             RETURNING {CASH_FLOW_COLUMNS}"
        ))?
        .query_one(
            (
                cash_flow.date,
                cash_flow.status_id,
                cash_flow.type_id,
                cash_flow.category_id,
                cash_flow.subcategory_id,
                cash_flow.amount,
                &cash_flow.comment,
                now,
            ),
            map_cash_flow_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a cash flow record by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid record,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_cash_flow(id: CashFlowId, connection: &Connection) -> Result<CashFlow, Error> {
    let cash_flow = connection
        .prepare(&format!(
            "SELECT {CASH_FLOW_COLUMNS} FROM cash_flow WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_cash_flow_row)?;

    Ok(cash_flow)
}

/// Overwrite the fields of the record `id` and bump its `updated_at`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingCashFlow] if `id` does not refer to a valid record,
/// - [Error::SubCategoryNotInCategory] if the subcategory belongs to another category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_cash_flow(
    id: CashFlowId,
    cash_flow: &NewCashFlow,
    connection: &Connection,
) -> Result<(), Error> {
    ensure_subcategory_in_category(cash_flow.category_id, cash_flow.subcategory_id, connection)?;

    let rows_affected = connection.execute(
        "UPDATE cash_flow
         SET date = ?1, status_id = ?2, type_id = ?3, category_id = ?4, subcategory_id = ?5,
             amount = ?6, comment = ?7, updated_at = ?8
         WHERE id = ?9",
        (
            cash_flow.date,
            cash_flow.status_id,
            cash_flow.type_id,
            cash_flow.category_id,
            cash_flow.subcategory_id,
            cash_flow.amount,
            &cash_flow.comment,
            OffsetDateTime::now_utc(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCashFlow);
    }

    Ok(())
}

/// Delete the record `id`.
///
/// # Errors
/// Returns [Error::DeleteMissingCashFlow] if `id` does not refer to a valid record.
pub fn delete_cash_flow(id: CashFlowId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM cash_flow WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCashFlow);
    }

    Ok(())
}

/// Get the total number of cash flow records in the database.
#[cfg(test)]
pub(crate) fn count_cash_flows(connection: &Connection) -> Result<u64, Error> {
    let count: i64 =
        connection.query_row("SELECT COUNT(id) FROM cash_flow;", [], |row| row.get(0))?;

    Ok(count as u64)
}

/// Create the cash flow table and its indexes.
///
/// Requires the dictionary and subcategory tables to exist.
pub fn create_cash_flow_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS cash_flow (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                status_id INTEGER NOT NULL,
                type_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                subcategory_id INTEGER NOT NULL,
                amount INTEGER NOT NULL,
                comment TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(status_id) REFERENCES status(id),
                FOREIGN KEY(type_id) REFERENCES operation_type(id),
                FOREIGN KEY(category_id) REFERENCES category(id),
                FOREIGN KEY(subcategory_id) REFERENCES subcategory(id)
                )",
        (),
    )?;

    // Newest-first listing and the date range filter.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_cash_flow_date ON cash_flow(date DESC, id DESC);",
        (),
    )?;

    for column in ["status_id", "type_id", "category_id", "subcategory_id"] {
        connection.execute(
            &format!("CREATE INDEX IF NOT EXISTS idx_cash_flow_{column} ON cash_flow({column});"),
            (),
        )?;
    }

    Ok(())
}

/// Map a database row to a [CashFlow].
fn map_cash_flow_row(row: &Row) -> Result<CashFlow, rusqlite::Error> {
    Ok(CashFlow {
        id: row.get(0)?,
        date: row.get(1)?,
        status_id: row.get(2)?,
        type_id: row.get(3)?,
        category_id: row.get(4)?,
        subcategory_id: row.get(5)?,
        amount: row.get(6)?,
        comment: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
