//! Cash flow records: the amount model, storage, the filtered list and the
//! create, edit and delete pages.

mod amount;
mod core;
mod create;
mod delete;
mod edit;
pub(crate) mod form;
mod list;
mod query;

pub use amount::Amount;
#[cfg(test)]
pub(crate) use core::count_cash_flows;
pub use core::{
    CashFlow, CashFlowId, NewCashFlow, create_cash_flow, create_cash_flow_table, delete_cash_flow,
    get_cash_flow, update_cash_flow,
};
pub use create::{create_cash_flow_endpoint, get_new_cash_flow_page};
pub use delete::{delete_cash_flow_endpoint, get_delete_cash_flow_page};
pub use edit::{get_edit_cash_flow_page, update_cash_flow_endpoint};
pub use list::get_cash_flows_page;
