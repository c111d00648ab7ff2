//! The subcategory form shared by the create and edit pages.

use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error,
    dictionary::{
        DictionaryEntry, DictionaryKind, EntryId, EntryName, MAX_NAME_LENGTH,
        form::FormMethod, get_entry, validate_unique_subcategory,
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        SelectOption, select_field,
    },
    subcategory::SubCategoryFormData,
};

pub(crate) const INVALID_CATEGORY_MESSAGE: &str = "Select a valid category";

/// Field errors for the subcategory form.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SubCategoryFormErrors {
    pub name: Option<String>,
    pub category: Option<String>,
}

/// The outcome of checking a submitted subcategory form.
pub(crate) enum SubCategoryCheck {
    Valid {
        name: EntryName,
        category_id: EntryId,
    },
    Invalid(SubCategoryFormErrors),
}

/// Check the name and category in `form_data`.
///
/// `excluding_id` is the subcategory being edited, if any.
pub(crate) fn check_subcategory_form(
    form_data: &SubCategoryFormData,
    excluding_id: Option<EntryId>,
    connection: &Connection,
) -> Result<SubCategoryCheck, Error> {
    let mut errors = SubCategoryFormErrors::default();

    let name = EntryName::new(&form_data.name)
        .inspect_err(|error| errors.name = Some(format!("Error: {error}")))
        .ok();

    let category_id = match form_data.category_id {
        Some(category_id) => match get_entry(DictionaryKind::Category, category_id, connection) {
            Ok(category) => Some(category.id),
            Err(Error::NotFound) => None,
            Err(error) => return Err(error),
        },
        None => None,
    };

    if category_id.is_none() {
        errors.category = Some(INVALID_CATEGORY_MESSAGE.to_owned());
    }

    let (Some(name), Some(category_id)) = (name, category_id) else {
        return Ok(SubCategoryCheck::Invalid(errors));
    };

    match validate_unique_subcategory(&name, category_id, excluding_id, connection) {
        Ok(()) => Ok(SubCategoryCheck::Valid { name, category_id }),
        Err(error @ Error::DuplicateSubCategory(_)) => {
            errors.name = Some(format!("Error: {error}"));
            Ok(SubCategoryCheck::Invalid(errors))
        }
        Err(error) => Err(error),
    }
}

pub(crate) fn category_options(categories: &[DictionaryEntry]) -> Vec<SelectOption> {
    categories
        .iter()
        .map(|category| SelectOption {
            value: category.id.to_string(),
            label: category.name.to_string(),
        })
        .collect()
}

pub(crate) struct SubCategoryForm<'a> {
    pub method: FormMethod,
    pub endpoint: &'a str,
    pub name: &'a str,
    pub category_id: Option<EntryId>,
    pub categories: &'a [DictionaryEntry],
    pub errors: &'a SubCategoryFormErrors,
}

impl SubCategoryForm<'_> {
    pub(crate) fn into_html(self) -> Markup {
        let submit_label = match self.method {
            FormMethod::Post => "Create Subcategory",
            FormMethod::Put => "Update Subcategory",
        };
        let selected_category = self
            .category_id
            .map(|category_id| category_id.to_string())
            .unwrap_or_default();

        html! {
            form
                hx-post=[(self.method == FormMethod::Post).then_some(self.endpoint)]
                hx-put=[(self.method == FormMethod::Put).then_some(self.endpoint)]
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (select_field(
                    "category_id",
                    "Category",
                    "Select a category",
                    &category_options(self.categories),
                    &selected_category,
                    self.errors.category.as_deref(),
                ))

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Subcategory Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        placeholder="Subcategory Name"
                        value=(self.name)
                        maxlength=(MAX_NAME_LENGTH)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    @if let Some(error) = &self.errors.name {
                        p class=(FORM_ERROR_STYLE) { (error) }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
            }
        }
    }
}

#[cfg(test)]
mod check_subcategory_form_tests {
    use crate::{
        subcategory::{
            SubCategoryFormData,
            form::{INVALID_CATEGORY_MESSAGE, SubCategoryCheck, check_subcategory_form},
        },
        test_utils::{TestDictionaries, get_test_connection},
    };

    fn form(name: &str, category_id: Option<i64>) -> SubCategoryFormData {
        SubCategoryFormData {
            name: name.to_owned(),
            category_id,
        }
    }

    #[test]
    fn accepts_new_name_in_category() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);

        let got = check_subcategory_form(
            &form(" Yandex ", Some(dictionaries.marketing)),
            None,
            &connection,
        )
        .unwrap();

        match got {
            SubCategoryCheck::Valid { name, category_id } => {
                assert_eq!(name.as_ref(), "Yandex");
                assert_eq!(category_id, dictionaries.marketing);
            }
            SubCategoryCheck::Invalid(errors) => panic!("want valid form, got {errors:?}"),
        }
    }

    #[test]
    fn reports_all_field_errors_together() {
        let connection = get_test_connection();

        let got = check_subcategory_form(&form("", None), None, &connection).unwrap();

        let SubCategoryCheck::Invalid(errors) = got else {
            panic!("want invalid form");
        };
        assert_eq!(errors.name.as_deref(), Some("Error: Name cannot be empty"));
        assert_eq!(errors.category.as_deref(), Some(INVALID_CATEGORY_MESSAGE));
    }

    #[test]
    fn rejects_unknown_category() {
        let connection = get_test_connection();
        TestDictionaries::seed(&connection);

        let got = check_subcategory_form(&form("Avito", Some(999)), None, &connection).unwrap();

        let SubCategoryCheck::Invalid(errors) = got else {
            panic!("want invalid form");
        };
        assert_eq!(errors.name, None);
        assert_eq!(errors.category.as_deref(), Some(INVALID_CATEGORY_MESSAGE));
    }

    #[test]
    fn rejects_duplicate_in_same_category_ignoring_case() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);

        let got = check_subcategory_form(
            &form("AVITO", Some(dictionaries.marketing)),
            None,
            &connection,
        )
        .unwrap();

        let SubCategoryCheck::Invalid(errors) = got else {
            panic!("want invalid form");
        };
        assert_eq!(
            errors.name.as_deref(),
            Some("Error: A subcategory named \"AVITO\" already exists in the selected category")
        );
    }
}
