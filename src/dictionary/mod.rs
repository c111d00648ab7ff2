//! The lookup dictionaries that cash flow records refer to: statuses, types, categories and
//! subcategories.

mod cascade;
mod create;
mod db;
mod delete;
mod domain;
mod edit;
pub(crate) mod form;
mod list;
mod validation;

pub use cascade::{DeletionImpact, delete_with_dependents, preview_deletion};
pub use create::{create_entry_endpoint, get_new_entry_page};
pub use db::{
    count_cash_flows_per_entry, create_dictionary_tables, create_entry, get_all_entries,
    get_entry, update_entry,
};
pub use delete::{delete_entry_endpoint, get_delete_entry_page};
pub use domain::{
    DictionaryEntry, DictionaryKind, EntryFormData, EntryId, EntryName, MAX_NAME_LENGTH,
};
pub use edit::{get_edit_entry_page, update_entry_endpoint};
pub use list::get_dictionaries_page;
pub use validation::{validate_unique_name, validate_unique_subcategory};
