//! Database operations for subcategories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    dictionary::{DictionaryKind, EntryId, EntryName},
    subcategory::{SubCategory, SubCategoryListing, SubCategoryOption},
};

/// Initialize the subcategory table.
///
/// Requires the category table to exist.
pub fn create_subcategory_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS subcategory (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            UNIQUE(name, category_id),
            FOREIGN KEY(category_id) REFERENCES category(id)
        );

        CREATE INDEX IF NOT EXISTS idx_subcategory_category ON subcategory(category_id);",
    )
}

/// Create a subcategory under the category `category_id`.
///
/// # Errors
/// Returns an SQL error if the category does not exist or the pair is already taken.
pub fn create_subcategory(
    name: EntryName,
    category_id: EntryId,
    connection: &Connection,
) -> Result<SubCategory, Error> {
    connection.execute(
        "INSERT INTO subcategory (name, category_id) VALUES (?1, ?2);",
        (name.as_ref(), category_id),
    )?;

    let id = connection.last_insert_rowid();

    Ok(SubCategory {
        id,
        name,
        category_id,
    })
}

/// Retrieve a subcategory by ID.
pub fn get_subcategory(
    subcategory_id: EntryId,
    connection: &Connection,
) -> Result<SubCategory, Error> {
    connection
        .prepare("SELECT id, name, category_id FROM subcategory WHERE id = :id;")?
        .query_row(&[(":id", &subcategory_id)], |row| {
            let raw_name: String = row.get(1)?;

            Ok(SubCategory {
                id: row.get(0)?,
                name: EntryName::new_unchecked(&raw_name),
                category_id: row.get(2)?,
            })
        })
        .map_err(|error| error.into())
}

const LISTING_QUERY: &str = "SELECT subcategory.id, subcategory.name, subcategory.category_id, category.name \
    FROM subcategory INNER JOIN category ON category.id = subcategory.category_id";

/// Retrieve a subcategory along with its category's name.
pub fn get_subcategory_listing(
    subcategory_id: EntryId,
    connection: &Connection,
) -> Result<SubCategoryListing, Error> {
    connection
        .prepare(&format!("{LISTING_QUERY} WHERE subcategory.id = :id;"))?
        .query_row(&[(":id", &subcategory_id)], map_listing_row)
        .map_err(|error| error.into())
}

/// Retrieve every subcategory, grouped by category name and then sorted by name.
pub fn get_all_subcategory_listings(
    connection: &Connection,
) -> Result<Vec<SubCategoryListing>, Error> {
    connection
        .prepare(&format!(
            "{LISTING_QUERY} ORDER BY category.name COLLATE NOCASE ASC, \
            subcategory.name COLLATE NOCASE ASC, subcategory.id ASC;"
        ))?
        .query_map([], map_listing_row)?
        .map(|maybe_listing| maybe_listing.map_err(|error| error.into()))
        .collect()
}

/// Rename a subcategory and/or move it to another category.
///
/// # Errors
/// Returns [Error::UpdateMissingEntry] if the subcategory does not exist.
pub fn update_subcategory(
    subcategory_id: EntryId,
    name: EntryName,
    category_id: EntryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE subcategory SET name = ?1, category_id = ?2 WHERE id = ?3",
        (name.as_ref(), category_id, subcategory_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingEntry(DictionaryKind::SubCategory));
    }

    Ok(())
}

/// The subcategories of the category `category_id`, sorted by name and then ID.
///
/// Returns an empty list if no category is given or the category does not exist.
pub fn list_subcategories(
    category_id: Option<EntryId>,
    connection: &Connection,
) -> Result<Vec<SubCategoryOption>, Error> {
    let Some(category_id) = category_id else {
        return Ok(Vec::new());
    };

    connection
        .prepare(
            "SELECT id, name FROM subcategory WHERE category_id = ?1 \
            ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?
        .query_map([category_id], |row| {
            Ok(SubCategoryOption {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .map(|maybe_option| maybe_option.map_err(|error| error.into()))
        .collect()
}

fn map_listing_row(row: &Row) -> Result<SubCategoryListing, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(SubCategoryListing {
        id: row.get(0)?,
        name: EntryName::new_unchecked(&raw_name),
        category_id: row.get(2)?,
        category_name: row.get(3)?,
    })
}
