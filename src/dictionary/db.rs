//! Database operations for statuses, types and categories.
//!
//! The functions here work on any [DictionaryKind], but creating entries only
//! makes sense for the simple dictionaries. Subcategories are created through
//! the subcategory module because they also need a category.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    dictionary::{DictionaryEntry, DictionaryKind, EntryId, EntryName},
};

/// Create an entry in the dictionary `kind` and return it with its generated ID.
pub fn create_entry(
    kind: DictionaryKind,
    name: EntryName,
    connection: &Connection,
) -> Result<DictionaryEntry, Error> {
    connection.execute(
        &format!("INSERT INTO {} (name) VALUES (?1);", kind.table()),
        (name.as_ref(),),
    )?;

    let id = connection.last_insert_rowid();

    Ok(DictionaryEntry { id, name })
}

/// Retrieve a single entry of the dictionary `kind` by ID.
pub fn get_entry(
    kind: DictionaryKind,
    entry_id: EntryId,
    connection: &Connection,
) -> Result<DictionaryEntry, Error> {
    connection
        .prepare(&format!(
            "SELECT id, name FROM {} WHERE id = :id;",
            kind.table()
        ))?
        .query_row(&[(":id", &entry_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all entries of the dictionary `kind` ordered alphabetically by name.
pub fn get_all_entries(
    kind: DictionaryKind,
    connection: &Connection,
) -> Result<Vec<DictionaryEntry>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, name FROM {} ORDER BY name COLLATE NOCASE ASC, id ASC;",
            kind.table()
        ))?
        .query_map([], map_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Rename an entry. Returns an error if the entry doesn't exist.
pub fn update_entry(
    kind: DictionaryKind,
    entry_id: EntryId,
    new_name: EntryName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("UPDATE {} SET name = ?1 WHERE id = ?2", kind.table()),
        (new_name.as_ref(), entry_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingEntry(kind));
    }

    Ok(())
}

/// Count the cash flow records that reference each entry of the dictionary `kind`.
///
/// Entries that no record references are absent from the map.
pub fn count_cash_flows_per_entry(
    kind: DictionaryKind,
    connection: &Connection,
) -> Result<HashMap<EntryId, u32>, Error> {
    let column = kind.cash_flow_column();
    let result: Result<HashMap<EntryId, u32>, rusqlite::Error> = connection
        .prepare(&format!(
            "SELECT {column}, COUNT(1) FROM cash_flow GROUP BY {column}"
        ))?
        .query_map((), |row| {
            let entry_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((entry_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the status, type and category tables.
pub fn create_dictionary_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in DictionaryKind::SIMPLE {
        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );",
            table = kind.table()
        ))?;
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<DictionaryEntry, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = EntryName::new_unchecked(&raw_name);

    Ok(DictionaryEntry { id, name })
}
