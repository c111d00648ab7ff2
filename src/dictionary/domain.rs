//! Core dictionary domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The maximum number of characters in a dictionary entry name.
pub const MAX_NAME_LENGTH: usize = 100;

/// The lookup tables that cash flow records refer to.
///
/// Statuses, types and categories are flat lists of names. Subcategories also
/// belong to a category, so they have their own forms and queries, but they
/// share the dictionary listing and deletion pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryKind {
    Status,
    Type,
    Category,
    SubCategory,
}

impl DictionaryKind {
    /// The dictionaries that only hold a name.
    pub const SIMPLE: [DictionaryKind; 3] = [
        DictionaryKind::Status,
        DictionaryKind::Type,
        DictionaryKind::Category,
    ];

    /// The database table that holds the entries of this dictionary.
    pub fn table(self) -> &'static str {
        match self {
            DictionaryKind::Status => "status",
            DictionaryKind::Type => "operation_type",
            DictionaryKind::Category => "category",
            DictionaryKind::SubCategory => "subcategory",
        }
    }

    /// The `cash_flow` column that references entries of this dictionary.
    pub fn cash_flow_column(self) -> &'static str {
        match self {
            DictionaryKind::Status => "status_id",
            DictionaryKind::Type => "type_id",
            DictionaryKind::Category => "category_id",
            DictionaryKind::SubCategory => "subcategory_id",
        }
    }

    /// The singular name for display in headings, e.g. "Status".
    pub fn label(self) -> &'static str {
        match self {
            DictionaryKind::Status => "Status",
            DictionaryKind::Type => "Type",
            DictionaryKind::Category => "Category",
            DictionaryKind::SubCategory => "Subcategory",
        }
    }

    /// The plural name for display in headings, e.g. "Statuses".
    pub fn plural_label(self) -> &'static str {
        match self {
            DictionaryKind::Status => "Statuses",
            DictionaryKind::Type => "Types",
            DictionaryKind::Category => "Categories",
            DictionaryKind::SubCategory => "Subcategories",
        }
    }
}

/// The lowercase name used in URLs and messages, e.g. "subcategory".
impl Display for DictionaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DictionaryKind::Status => "status",
            DictionaryKind::Type => "type",
            DictionaryKind::Category => "category",
            DictionaryKind::SubCategory => "subcategory",
        };

        write!(f, "{name}")
    }
}

/// A validated dictionary entry name: trimmed, non-empty and at most
/// [MAX_NAME_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct EntryName(String);

impl EntryName {
    /// Create an entry name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is empty or
    /// only whitespace, or an [Error::NameTooLong] if it is longer than
    /// [MAX_NAME_LENGTH] characters after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else if name.chars().count() > MAX_NAME_LENGTH {
            Err(Error::NameTooLong(MAX_NAME_LENGTH))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an entry name without validation.
    ///
    /// The caller should ensure that the string is trimmed, not empty and not too long.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the invariants are violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EntryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryName::new(s)
    }
}

impl Display for EntryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a dictionary entry.
pub type EntryId = i64;

/// A status, type or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct DictionaryEntry {
    pub id: EntryId,
    pub name: EntryName,
}

/// Form data for creating and editing a status, type or category.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryFormData {
    pub name: String,
}


#[cfg(test)]
mod dictionary_kind_tests {
    use crate::dictionary::DictionaryKind;

    #[test]
    fn deserializes_from_path_segment() {
        let kinds: Vec<DictionaryKind> =
            serde_json::from_str(r#"["status", "type", "category", "subcategory"]"#).unwrap();

        assert_eq!(
            kinds,
            vec![
                DictionaryKind::Status,
                DictionaryKind::Type,
                DictionaryKind::Category,
                DictionaryKind::SubCategory,
            ]
        );
    }

    #[test]
    fn display_matches_path_segment() {
        for kind in [
            DictionaryKind::Status,
            DictionaryKind::Type,
            DictionaryKind::Category,
            DictionaryKind::SubCategory,
        ] {
            let serialized = serde_json::to_string(&kind).unwrap();

            assert_eq!(serialized, format!("\"{kind}\""));
        }
    }
}
