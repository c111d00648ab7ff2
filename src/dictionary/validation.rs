//! Case-insensitive name uniqueness checks for dictionary entries.
//!
//! SQLite's `NOCASE` collation only folds ASCII letters, so names are compared
//! in Rust with full Unicode lowercasing instead.

use rusqlite::Connection;

use crate::{
    Error,
    dictionary::{DictionaryKind, EntryId, EntryName},
};

/// Check that no other entry in the dictionary `kind` is called `name`, ignoring case.
///
/// `excluding_id` is the entry being edited, which may keep its own name.
///
/// # Errors
/// Returns [Error::DuplicateName] if the name is taken, or an SQL error.
pub fn validate_unique_name(
    kind: DictionaryKind,
    name: &EntryName,
    excluding_id: Option<EntryId>,
    connection: &Connection,
) -> Result<(), Error> {
    let names = connection
        .prepare(&format!(
            "SELECT name FROM {} WHERE id IS NOT ?1",
            kind.table()
        ))?
        .query_map([excluding_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if contains_ignoring_case(&names, name) {
        return Err(Error::DuplicateName(kind, name.to_string()));
    }

    Ok(())
}

/// Check that the category `category_id` has no other subcategory called `name`, ignoring case.
///
/// Subcategories in different categories may share a name.
///
/// # Errors
/// Returns [Error::DuplicateSubCategory] if the name is taken, or an SQL error.
pub fn validate_unique_subcategory(
    name: &EntryName,
    category_id: EntryId,
    excluding_id: Option<EntryId>,
    connection: &Connection,
) -> Result<(), Error> {
    let names = connection
        .prepare("SELECT name FROM subcategory WHERE category_id = ?1 AND id IS NOT ?2")?
        .query_map((category_id, excluding_id), |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if contains_ignoring_case(&names, name) {
        return Err(Error::DuplicateSubCategory(name.to_string()));
    }

    Ok(())
}

fn contains_ignoring_case(names: &[String], name: &EntryName) -> bool {
    let name = name.as_ref().to_lowercase();

    names.iter().any(|existing| existing.to_lowercase() == name)
}
