//! The cash flow form shared by the create and edit pages.

use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    cash_flow::{Amount, CashFlow, NewCashFlow},
    dictionary::{
        DictionaryEntry, DictionaryKind, EntryId, form::FormMethod, get_all_entries, get_entry,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, FormField, HeadElement, SelectOption, base, select_field,
    },
    navigation::NavBar,
    subcategory::{SubCategoryOption, get_subcategory, list_subcategories},
};

const SUBCATEGORY_PLACEHOLDER: &str = "Select a subcategory";

/// The raw form fields, kept as strings so they can be echoed back on error.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowFormData {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "type")]
    pub operation_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub comment: String,
}

impl CashFlowFormData {
    /// Prefill the form with an existing record.
    pub fn from_cash_flow(cash_flow: &CashFlow) -> Self {
        Self {
            date: cash_flow.date.to_string(),
            status: cash_flow.status_id.to_string(),
            operation_type: cash_flow.type_id.to_string(),
            category: cash_flow.category_id.to_string(),
            subcategory: cash_flow.subcategory_id.to_string(),
            amount: cash_flow.amount.to_string(),
            comment: cash_flow.comment.clone().unwrap_or_default(),
        }
    }
}

/// Field errors for the cash flow form.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CashFlowFormErrors {
    pub date: Option<String>,
    pub status: Option<String>,
    pub operation_type: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub amount: Option<String>,
}

/// The outcome of checking a submitted cash flow form.
pub(crate) enum CashFlowCheck {
    Valid(NewCashFlow),
    Invalid(CashFlowFormErrors),
}

/// Parse a calendar date such as "2024-01-31" or "2024-1-5".
pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(
        raw.trim(),
        format_description!("[year]-[month padding:none]-[day padding:none]"),
    )
    .ok()
}

fn parse_id(raw: &str) -> Option<EntryId> {
    raw.trim().parse().ok()
}

/// Look up the entry of `kind` named by `raw`, if it exists.
fn existing_entry_id(
    kind: DictionaryKind,
    raw: &str,
    connection: &Connection,
) -> Result<Option<EntryId>, Error> {
    let Some(entry_id) = parse_id(raw) else {
        return Ok(None);
    };

    match get_entry(kind, entry_id, connection) {
        Ok(entry) => Ok(Some(entry.id)),
        Err(Error::NotFound) => Ok(None),
        Err(error) => Err(error),
    }
}

fn invalid_choice(kind: DictionaryKind) -> String {
    format!("Select a valid {kind}.")
}

/// Check every field of `form_data`, collecting all the field errors at once.
pub(crate) fn check_cash_flow_form(
    form_data: &CashFlowFormData,
    connection: &Connection,
) -> Result<CashFlowCheck, Error> {
    let mut errors = CashFlowFormErrors::default();

    let date = parse_date(&form_data.date);
    if date.is_none() {
        errors.date = Some("Enter a valid date in the format YYYY-MM-DD.".to_owned());
    }

    let status_id = existing_entry_id(DictionaryKind::Status, &form_data.status, connection)?;
    if status_id.is_none() {
        errors.status = Some(invalid_choice(DictionaryKind::Status));
    }

    let type_id = existing_entry_id(DictionaryKind::Type, &form_data.operation_type, connection)?;
    if type_id.is_none() {
        errors.operation_type = Some(invalid_choice(DictionaryKind::Type));
    }

    let category_id = existing_entry_id(DictionaryKind::Category, &form_data.category, connection)?;
    if category_id.is_none() {
        errors.category = Some(invalid_choice(DictionaryKind::Category));
    }

    let subcategory = match parse_id(&form_data.subcategory) {
        Some(subcategory_id) => match get_subcategory(subcategory_id, connection) {
            Ok(subcategory) => Some(subcategory),
            Err(Error::NotFound) => None,
            Err(error) => return Err(error),
        },
        None => None,
    };
    let subcategory_id = match (&subcategory, category_id) {
        (None, _) => {
            errors.subcategory = Some(invalid_choice(DictionaryKind::SubCategory));
            None
        }
        (Some(subcategory), Some(category_id)) if subcategory.category_id != category_id => {
            errors.subcategory = Some(Error::SubCategoryNotInCategory.to_string());
            None
        }
        (Some(subcategory), _) => Some(subcategory.id),
    };

    let amount = form_data
        .amount
        .parse::<Amount>()
        .inspect_err(|error| errors.amount = Some(error.to_string()))
        .ok();

    let comment = form_data.comment.trim();
    let comment = (!comment.is_empty()).then(|| comment.to_owned());

    match (date, status_id, type_id, category_id, subcategory_id, amount) {
        (
            Some(date),
            Some(status_id),
            Some(type_id),
            Some(category_id),
            Some(subcategory_id),
            Some(amount),
        ) => Ok(CashFlowCheck::Valid(NewCashFlow {
            date,
            status_id,
            type_id,
            category_id,
            subcategory_id,
            amount,
            comment,
        })),
        _ => Ok(CashFlowCheck::Invalid(errors)),
    }
}

/// The choices for the dropdowns in the cash flow form.
pub(crate) struct CashFlowFormOptions {
    pub statuses: Vec<DictionaryEntry>,
    pub types: Vec<DictionaryEntry>,
    pub categories: Vec<DictionaryEntry>,
    /// The subcategories of the selected category, empty if there is none.
    pub subcategories: Vec<SubCategoryOption>,
}

impl CashFlowFormOptions {
    /// Load the dropdown choices, with subcategories for the category in `form_data`.
    pub(crate) fn load(
        form_data: &CashFlowFormData,
        connection: &Connection,
    ) -> Result<Self, Error> {
        Ok(Self {
            statuses: get_all_entries(DictionaryKind::Status, connection)?,
            types: get_all_entries(DictionaryKind::Type, connection)?,
            categories: get_all_entries(DictionaryKind::Category, connection)?,
            subcategories: list_subcategories(parse_id(&form_data.category), connection)?,
        })
    }
}

fn entry_options(entries: &[DictionaryEntry]) -> Vec<SelectOption> {
    entries
        .iter()
        .map(|entry| SelectOption {
            value: entry.id.to_string(),
            label: entry.name.to_string(),
        })
        .collect()
}

pub(crate) struct CashFlowForm<'a> {
    pub method: FormMethod,
    pub endpoint: &'a str,
    pub values: &'a CashFlowFormData,
    pub options: &'a CashFlowFormOptions,
    pub errors: &'a CashFlowFormErrors,
}

impl CashFlowForm<'_> {
    pub(crate) fn into_html(self) -> Markup {
        let values = self.values;
        let errors = self.errors;
        let submit_label = match self.method {
            FormMethod::Post => "Create Record",
            FormMethod::Put => "Update Record",
        };
        let has_category = parse_id(&values.category).is_some();

        html! {
            form
                hx-post=[(self.method == FormMethod::Post).then_some(self.endpoint)]
                hx-put=[(self.method == FormMethod::Put).then_some(self.endpoint)]
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (FormField {
                    name: "date",
                    label: "Date",
                    input_type: "date",
                    value: &values.date,
                    required: true,
                    error: errors.date.as_deref(),
                }.into_html())

                (select_field(
                    "status",
                    "Status",
                    "Select a status",
                    &entry_options(&self.options.statuses),
                    values.status.trim(),
                    errors.status.as_deref(),
                ))

                (select_field(
                    "type",
                    "Type",
                    "Select a type",
                    &entry_options(&self.options.types),
                    values.operation_type.trim(),
                    errors.operation_type.as_deref(),
                ))

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select
                        id="category"
                        name="category"
                        required
                        data-options-url=(endpoints::SUBCATEGORIES_API)
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[!has_category] { "Select a category" }

                        @for option in entry_options(&self.options.categories) {
                            option
                                value=(option.value)
                                selected[option.value == values.category.trim()]
                            {
                                (option.label)
                            }
                        }
                    }

                    @if let Some(error) = &errors.category {
                        p id="category-error" class=(FORM_ERROR_STYLE) { (error) }
                    }
                }

                div
                {
                    label for="subcategory" class=(FORM_LABEL_STYLE) { "Subcategory" }

                    select
                        id="subcategory"
                        name="subcategory"
                        required
                        disabled[!has_category]
                        data-placeholder=(SUBCATEGORY_PLACEHOLDER)
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { (SUBCATEGORY_PLACEHOLDER) }

                        @for option in &self.options.subcategories {
                            @let value = option.id.to_string();
                            option
                                value=(value)
                                selected[value == values.subcategory.trim()]
                            {
                                (option.name)
                            }
                        }
                    }

                    @if let Some(error) = &errors.subcategory {
                        p id="subcategory-error" class=(FORM_ERROR_STYLE) { (error) }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        id="amount"
                        name="amount"
                        type="text"
                        inputmode="decimal"
                        placeholder="0.00"
                        value=(values.amount)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    @if let Some(error) = &errors.amount {
                        p id="amount-error" class=(FORM_ERROR_STYLE) { (error) }
                    }
                }

                div
                {
                    label for="comment" class=(FORM_LABEL_STYLE) { "Comment" }

                    textarea
                        id="comment"
                        name="comment"
                        rows="3"
                        placeholder="Optional"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        (values.comment)
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
            }
        }
    }
}

/// Render a page holding the cash flow `form`.
pub(crate) fn cash_flow_page_view(title: &str, active_endpoint: &str, form: &Markup) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();
    let head_elements = [HeadElement::ScriptSource(PreEscaped(
        include_str!("subcategory_dropdown.js").to_owned(),
    ))];

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { (title) }
            (form)
        }
    };

    base(title, &head_elements, &content)
}


#[cfg(test)]
mod cash_flow_form_view_tests {
    use maud::html;
    use scraper::{Html, Selector};

    use crate::{
        cash_flow::form::{
            CashFlowForm, CashFlowFormData, CashFlowFormErrors, CashFlowFormOptions,
        },
        dictionary::{DictionaryEntry, EntryName, form::FormMethod},
        subcategory::SubCategoryOption,
    };

    fn options() -> CashFlowFormOptions {
        CashFlowFormOptions {
            statuses: vec![],
            types: vec![],
            categories: vec![DictionaryEntry {
                id: 3,
                name: EntryName::new_unchecked("Marketing"),
            }],
            subcategories: vec![SubCategoryOption {
                id: 7,
                name: "Avito".to_owned(),
            }],
        }
    }

    fn render(values: &CashFlowFormData) -> Html {
        let options = options();
        let markup = html! {
            (CashFlowForm {
                method: FormMethod::Post,
                endpoint: "/api/cash_flows",
                values,
                options: &options,
                errors: &CashFlowFormErrors::default(),
            }.into_html())
        };

        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn subcategory_is_disabled_without_category() {
        let html = render(&CashFlowFormData::default());

        let subcategory = html
            .select(&Selector::parse("select#subcategory").unwrap())
            .next()
            .expect("No subcategory select");
        assert!(subcategory.value().attr("disabled").is_some());
    }

    #[test]
    fn echoes_selected_category_and_subcategory() {
        let html = render(&CashFlowFormData {
            category: "3".to_owned(),
            subcategory: "7".to_owned(),
            ..Default::default()
        });

        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();
        assert!(selected.contains(&"Marketing".to_owned()), "got {selected:?}");
        assert!(selected.contains(&"Avito".to_owned()), "got {selected:?}");
        let subcategory = html
            .select(&Selector::parse("select#subcategory").unwrap())
            .next()
            .expect("No subcategory select");
        assert!(subcategory.value().attr("disabled").is_none());
    }

    #[test]
    fn category_select_points_at_lookup_endpoint() {
        let html = render(&CashFlowFormData::default());

        let category = html
            .select(&Selector::parse("select#category").unwrap())
            .next()
            .expect("No category select");
        assert_eq!(
            category.value().attr("data-options-url"),
            Some("/api/subcategories")
        );
    }
}
