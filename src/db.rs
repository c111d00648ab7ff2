//! Database initialization for the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, cash_flow::create_cash_flow_table, dictionary::create_dictionary_tables,
    subcategory::create_subcategory_table,
};

/// Create the all of the database tables for the application.
///
/// Foreign key enforcement is switched on for `connection` so that cash flow
/// records can never point at a missing dictionary entry. Nothing cascades at
/// the database level: removing an entry and the records that use it is done
/// explicitly by the dictionary module.
///
/// # Errors
/// This function may return a [Error::SqlError] if something went wrong creating the tables.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_dictionary_tables(&transaction)?;
    create_subcategory_table(&transaction)?;
    create_cash_flow_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
