//! Subcategories: names that belong to a category, and the lookup that drives
//! the dependent subcategory dropdown.

mod create;
mod db;
mod domain;
mod edit;
pub(crate) mod form;
mod lookup;

pub use create::{create_subcategory_endpoint, get_new_subcategory_page};
pub use db::{
    create_subcategory, create_subcategory_table, get_all_subcategory_listings, get_subcategory,
    get_subcategory_listing, list_subcategories, update_subcategory,
};
pub use domain::{SubCategory, SubCategoryFormData, SubCategoryListing, SubCategoryOption};
pub use edit::{get_edit_subcategory_page, update_subcategory_endpoint};
pub use lookup::get_subcategories_endpoint;
