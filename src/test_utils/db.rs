use rusqlite::Connection;
use time::macros::date;

use crate::{
    cash_flow::{Amount, CashFlow, NewCashFlow, create_cash_flow},
    db::initialize,
    dictionary::{DictionaryKind, EntryId, EntryName, create_entry},
    subcategory::create_subcategory,
};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// The IDs of a small set of dictionary entries.
///
/// Marketing has the subcategories Avito and Farpost, Infrastructure has Hosting.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TestDictionaries {
    pub business: EntryId,
    pub personal: EntryId,
    pub income: EntryId,
    pub expense: EntryId,
    pub marketing: EntryId,
    pub infrastructure: EntryId,
    pub avito: EntryId,
    pub farpost: EntryId,
    pub hosting: EntryId,
}

fn insert_entry(kind: DictionaryKind, name: &str, connection: &Connection) -> EntryId {
    create_entry(kind, EntryName::new_unchecked(name), connection)
        .unwrap_or_else(|error| panic!("Could not create {kind} {name}: {error}"))
        .id
}

fn insert_subcategory(name: &str, category_id: EntryId, connection: &Connection) -> EntryId {
    create_subcategory(EntryName::new_unchecked(name), category_id, connection)
        .unwrap_or_else(|error| panic!("Could not create subcategory {name}: {error}"))
        .id
}

impl TestDictionaries {
    pub(crate) fn seed(connection: &Connection) -> Self {
        let marketing = insert_entry(DictionaryKind::Category, "Marketing", connection);
        let infrastructure = insert_entry(DictionaryKind::Category, "Infrastructure", connection);

        Self {
            business: insert_entry(DictionaryKind::Status, "Business", connection),
            personal: insert_entry(DictionaryKind::Status, "Personal", connection),
            income: insert_entry(DictionaryKind::Type, "Income", connection),
            expense: insert_entry(DictionaryKind::Type, "Expense", connection),
            marketing,
            infrastructure,
            avito: insert_subcategory("Avito", marketing, connection),
            farpost: insert_subcategory("Farpost", marketing, connection),
            hosting: insert_subcategory("Hosting", infrastructure, connection),
        }
    }

    /// A business expense for Marketing / Avito.
    pub(crate) fn new_cash_flow(&self) -> NewCashFlow {
        NewCashFlow {
            date: date!(2024 - 01 - 15),
            status_id: self.business,
            type_id: self.expense,
            category_id: self.marketing,
            subcategory_id: self.avito,
            amount: Amount::from_cents(250_000),
            comment: None,
        }
    }

    /// A business expense for Infrastructure / Hosting.
    pub(crate) fn in_hosting(&self) -> NewCashFlow {
        NewCashFlow {
            category_id: self.infrastructure,
            subcategory_id: self.hosting,
            ..self.new_cash_flow()
        }
    }

    pub(crate) fn with_status(&self, status_id: EntryId) -> NewCashFlow {
        NewCashFlow {
            status_id,
            ..self.new_cash_flow()
        }
    }
}

pub(crate) fn insert_test_cash_flow(
    connection: &Connection,
    new_cash_flow: &NewCashFlow,
) -> CashFlow {
    create_cash_flow(new_cash_flow, connection).expect("Could not create cash flow record")
}
