//! Deleting a dictionary entry together with everything that depends on it.
//!
//! - Deleting a status, type or subcategory deletes the cash flow records that use it.
//! - Deleting a category deletes its subcategories, the records that use the
//!   category and the records that use any of its subcategories.
//!
//! All of the deletes for one entry run in a single transaction, so either
//! everything goes or nothing does.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    dictionary::{DictionaryKind, EntryId, get_entry},
};

/// How many dependent rows a deletion removes (or would remove) besides the entry itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionImpact {
    pub cash_flows: usize,
    pub subcategories: usize,
}

impl DeletionImpact {
    /// The total number of dependent rows.
    pub fn total(&self) -> usize {
        self.cash_flows + self.subcategories
    }

    /// A message describing a completed deletion of `kind` named `name`.
    pub fn deleted_message(&self, kind: DictionaryKind, name: &str) -> String {
        let label = kind.label();

        match kind {
            DictionaryKind::Category => format!(
                "{label} \"{name}\" and {} related items were deleted ({} cash flow records, {} subcategories)",
                self.total(),
                self.cash_flows,
                self.subcategories
            ),
            _ => format!(
                "{label} \"{name}\" and {} related cash flow records were deleted",
                self.cash_flows
            ),
        }
    }

    /// A warning describing what deleting an entry of `kind` will remove.
    pub fn warning_message(&self, kind: DictionaryKind) -> String {
        match kind {
            DictionaryKind::Category => format!(
                "This will also delete {} cash flow records and {} subcategories.",
                self.cash_flows, self.subcategories
            ),
            _ => format!(
                "This will also delete {} cash flow records.",
                self.cash_flows
            ),
        }
    }
}

/// The SQL condition selecting the cash flow records that depend on the entry `?1` of `kind`.
fn dependent_cash_flows_condition(kind: DictionaryKind) -> String {
    match kind {
        DictionaryKind::Category => "category_id = ?1 \
            OR subcategory_id IN (SELECT id FROM subcategory WHERE category_id = ?1)"
            .to_owned(),
        _ => format!("{} = ?1", kind.cash_flow_column()),
    }
}

/// Count the rows that deleting the entry `entry_id` of `kind` would remove, without deleting anything.
///
/// # Errors
/// Returns [Error::NotFound] if the entry does not exist, or an SQL error.
pub fn preview_deletion(
    kind: DictionaryKind,
    entry_id: EntryId,
    connection: &Connection,
) -> Result<DeletionImpact, Error> {
    get_entry(kind, entry_id, connection)?;

    let cash_flows: i64 = connection.query_row(
        &format!(
            "SELECT COUNT(1) FROM cash_flow WHERE {}",
            dependent_cash_flows_condition(kind)
        ),
        [entry_id],
        |row| row.get(0),
    )?;

    let subcategories: i64 = match kind {
        DictionaryKind::Category => connection.query_row(
            "SELECT COUNT(1) FROM subcategory WHERE category_id = ?1",
            [entry_id],
            |row| row.get(0),
        )?,
        _ => 0,
    };

    Ok(DeletionImpact {
        cash_flows: cash_flows as usize,
        subcategories: subcategories as usize,
    })
}

/// Delete the entry `entry_id` of `kind` and every row that depends on it.
///
/// Returns the number of dependent rows that were removed.
///
/// # Errors
/// Returns [Error::DeleteMissingEntry] if the entry does not exist, in which
/// case nothing is deleted, or an SQL error.
pub fn delete_with_dependents(
    kind: DictionaryKind,
    entry_id: EntryId,
    connection: &Connection,
) -> Result<DeletionImpact, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    // Foreign keys are enforced, so rows must go before the rows they reference.
    let cash_flows = transaction.execute(
        &format!(
            "DELETE FROM cash_flow WHERE {}",
            dependent_cash_flows_condition(kind)
        ),
        [entry_id],
    )?;

    let subcategories = match kind {
        DictionaryKind::Category => {
            transaction.execute("DELETE FROM subcategory WHERE category_id = ?1", [entry_id])?
        }
        _ => 0,
    };

    let rows_affected = transaction.execute(
        &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
        [entry_id],
    )?;

    if rows_affected == 0 {
        // Dropping the transaction rolls it back.
        return Err(Error::DeleteMissingEntry(kind));
    }

    transaction.commit()?;

    Ok(DeletionImpact {
        cash_flows,
        subcategories,
    })
}

#[cfg(test)]
mod cascade_tests {
    use crate::{
        Error,
        cash_flow::{count_cash_flows, get_cash_flow},
        dictionary::{
            DeletionImpact, DictionaryKind, EntryName, delete_with_dependents, get_entry,
            preview_deletion,
        },
        subcategory::{get_subcategory, update_subcategory},
        test_utils::{TestDictionaries, get_test_connection, insert_test_cash_flow},
    };

    #[test]
    fn deleting_status_removes_only_its_records() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        let business =
            insert_test_cash_flow(&connection, &dictionaries.with_status(dictionaries.business));
        let personal =
            insert_test_cash_flow(&connection, &dictionaries.with_status(dictionaries.personal));

        let impact =
            delete_with_dependents(DictionaryKind::Status, dictionaries.business, &connection);

        assert_eq!(
            impact,
            Ok(DeletionImpact {
                cash_flows: 1,
                subcategories: 0
            })
        );
        assert_eq!(get_cash_flow(business.id, &connection), Err(Error::NotFound));
        assert!(get_cash_flow(personal.id, &connection).is_ok());
        assert_eq!(
            get_entry(DictionaryKind::Status, dictionaries.business, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn deleting_type_removes_its_records() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());
        insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());

        let impact =
            delete_with_dependents(DictionaryKind::Type, dictionaries.expense, &connection)
                .unwrap();

        assert_eq!(impact.cash_flows, 2);
        assert_eq!(count_cash_flows(&connection), Ok(0));
    }

    #[test]
    fn deleting_subcategory_removes_its_records() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());

        let impact = delete_with_dependents(
            DictionaryKind::SubCategory,
            dictionaries.avito,
            &connection,
        )
        .unwrap();

        assert_eq!(impact.cash_flows, 1);
        assert_eq!(impact.subcategories, 0);
        assert_eq!(
            get_subcategory(dictionaries.avito, &connection),
            Err(Error::NotFound)
        );
        assert!(get_subcategory(dictionaries.farpost, &connection).is_ok());
    }

    #[test]
    fn deleting_category_removes_subcategories_and_records() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());
        insert_test_cash_flow(&connection, &dictionaries.in_hosting());

        let impact =
            delete_with_dependents(DictionaryKind::Category, dictionaries.marketing, &connection)
                .unwrap();

        assert_eq!(
            impact,
            DeletionImpact {
                cash_flows: 1,
                subcategories: 2
            }
        );
        assert_eq!(count_cash_flows(&connection), Ok(1));
        assert_eq!(
            get_subcategory(dictionaries.avito, &connection),
            Err(Error::NotFound)
        );
        assert!(get_subcategory(dictionaries.hosting, &connection).is_ok());
    }

    #[test]
    fn deleting_category_removes_records_of_subcategories_moved_into_it() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        let cash_flow = insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());
        // The record stays in Marketing while Avito now belongs to Infrastructure.
        update_subcategory(
            dictionaries.avito,
            EntryName::new_unchecked("Avito"),
            dictionaries.infrastructure,
            &connection,
        )
        .unwrap();

        let preview = preview_deletion(
            DictionaryKind::Category,
            dictionaries.infrastructure,
            &connection,
        )
        .unwrap();
        let impact = delete_with_dependents(
            DictionaryKind::Category,
            dictionaries.infrastructure,
            &connection,
        )
        .unwrap();

        assert_eq!(
            impact,
            DeletionImpact {
                cash_flows: 1,
                subcategories: 2
            }
        );
        assert_eq!(preview, impact);
        assert_eq!(get_cash_flow(cash_flow.id, &connection), Err(Error::NotFound));
        assert_eq!(count_cash_flows(&connection), Ok(0));
    }

    #[test]
    fn preview_matches_deletion() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());
        insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());

        let preview =
            preview_deletion(DictionaryKind::Category, dictionaries.marketing, &connection)
                .unwrap();
        assert_eq!(count_cash_flows(&connection), Ok(2));

        let impact =
            delete_with_dependents(DictionaryKind::Category, dictionaries.marketing, &connection)
                .unwrap();

        assert_eq!(preview, impact);
    }

    #[test]
    fn preview_of_missing_entry_fails() {
        let connection = get_test_connection();

        let result = preview_deletion(DictionaryKind::Status, 99, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn deleting_missing_entry_fails_and_deletes_nothing() {
        let connection = get_test_connection();
        let dictionaries = TestDictionaries::seed(&connection);
        insert_test_cash_flow(&connection, &dictionaries.new_cash_flow());

        let result = delete_with_dependents(DictionaryKind::Status, 99, &connection);

        assert_eq!(
            result,
            Err(Error::DeleteMissingEntry(DictionaryKind::Status))
        );
        assert_eq!(count_cash_flows(&connection), Ok(1));
    }

    #[test]
    fn deleted_message_for_category_lists_counts() {
        let impact = DeletionImpact {
            cash_flows: 3,
            subcategories: 2,
        };

        let message = impact.deleted_message(DictionaryKind::Category, "Marketing");

        assert_eq!(
            message,
            "Category \"Marketing\" and 5 related items were deleted \
            (3 cash flow records, 2 subcategories)"
        );
    }

    #[test]
    fn deleted_message_for_status_lists_records() {
        let impact = DeletionImpact {
            cash_flows: 4,
            subcategories: 0,
        };

        let message = impact.deleted_message(DictionaryKind::Status, "Tax");

        assert_eq!(
            message,
            "Status \"Tax\" and 4 related cash flow records were deleted"
        );
    }
}
