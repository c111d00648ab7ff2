use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::dictionary::{EntryId, EntryName};

/// A subcategory, which always belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct SubCategory {
    pub id: EntryId,
    pub name: EntryName,
    pub category_id: EntryId,
}

/// A subcategory together with the name of its category, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategoryListing {
    pub id: EntryId,
    pub name: EntryName,
    pub category_id: EntryId,
    pub category_name: String,
}

/// Formats as "Name (Category)".
impl Display for SubCategoryListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.category_name)
    }
}

/// A choice for the subcategory dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategoryOption {
    pub id: EntryId,
    pub name: String,
}

/// Form data for creating and editing a subcategory.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubCategoryFormData {
    pub name: String,
    /// Empty when the user did not pick a category.
    #[serde(default)]
    pub category_id: Option<EntryId>,
}
