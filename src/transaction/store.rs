//! Stores each user's transactions in the local storage record, partitioned by email.
//!
//! Every function takes the [Session] of the user it acts for and only ever
//! reads or writes that user's partition. Mutations read the whole record,
//! change the session's partition, and write the whole record back.
//!
//! A session only counts while it is the stored current session. Once its
//! user has logged out, or someone else has logged in, every function here
//! does nothing: reads come back empty and writes leave storage untouched.

use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::{
    Error,
    storage::{TRANSACTIONS_KEY, load_record_or_default, save_record},
    user::{Session, get_current_user},
};

use super::core::{Transaction, TransactionId};

/// Every user's transactions, keyed by the user's email.
type Partitions = BTreeMap<String, Vec<Transaction>>;

fn get_partitions(connection: &Connection) -> Result<Partitions, Error> {
    load_record_or_default(TRANSACTIONS_KEY, connection)
}

/// Whether `session` is still the stored current session.
fn is_current(session: &Session, connection: &Connection) -> Result<bool, Error> {
    let is_current = get_current_user(connection)?.as_ref() == Some(session);

    if !is_current {
        tracing::debug!("ignoring stale session for {}", session.email());
    }

    Ok(is_current)
}

/// Get the logged in user's transactions in the order they were added.
///
/// # Errors
/// Returns an error if the transaction record could not be read.
pub fn get_transactions(
    session: &Session,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    if !is_current(session, connection)? {
        return Ok(Vec::new());
    }

    let mut partitions = get_partitions(connection)?;

    Ok(partitions.remove(session.email()).unwrap_or_default())
}

/// Append `transaction` to the logged in user's transactions.
///
/// The ID is not checked for uniqueness.
///
/// # Errors
/// Returns an error if the transaction record could not be read or written.
pub fn add_transaction(
    transaction: Transaction,
    session: &Session,
    connection: &Connection,
) -> Result<(), Error> {
    if !is_current(session, connection)? {
        return Ok(());
    }

    let mut partitions = get_partitions(connection)?;

    tracing::debug!("adding transaction {} for {}", transaction.id, session.email());
    partitions
        .entry(session.email().to_owned())
        .or_default()
        .push(transaction);

    save_record(TRANSACTIONS_KEY, &partitions, connection)
}

/// Replace the logged in user's transaction that has the same ID as `transaction`.
///
/// Returns `false` and leaves storage untouched if there is no such transaction.
///
/// # Errors
/// Returns an error if the transaction record could not be read or written.
pub fn update_transaction(
    transaction: Transaction,
    session: &Session,
    connection: &Connection,
) -> Result<bool, Error> {
    if !is_current(session, connection)? {
        return Ok(false);
    }

    let mut partitions = get_partitions(connection)?;

    let Some(existing) = partitions
        .get_mut(session.email())
        .and_then(|transactions| transactions.iter_mut().find(|t| t.id == transaction.id))
    else {
        tracing::debug!(
            "no transaction {} to update for {}",
            transaction.id,
            session.email()
        );
        return Ok(false);
    };

    tracing::debug!("updating transaction {} for {}", transaction.id, session.email());
    *existing = transaction;
    save_record(TRANSACTIONS_KEY, &partitions, connection)?;

    Ok(true)
}

/// Delete the logged in user's transaction with the ID `id`.
///
/// Returns `false` and leaves storage untouched if there is no such transaction.
///
/// # Errors
/// Returns an error if the transaction record could not be read or written.
pub fn delete_transaction(
    id: &TransactionId,
    session: &Session,
    connection: &Connection,
) -> Result<bool, Error> {
    if !is_current(session, connection)? {
        return Ok(false);
    }

    let mut partitions = get_partitions(connection)?;

    let Some(transactions) = partitions.get_mut(session.email()) else {
        tracing::debug!("no transactions to delete from for {}", session.email());
        return Ok(false);
    };

    let count_before = transactions.len();
    transactions.retain(|transaction| &transaction.id != id);

    if transactions.len() == count_before {
        tracing::debug!("no transaction {id} to delete for {}", session.email());
        return Ok(false);
    }

    tracing::debug!("deleted transaction {id} for {}", session.email());
    save_record(TRANSACTIONS_KEY, &partitions, connection)?;

    Ok(true)
}

/// Find the logged in user's transaction with the ID `id`.
///
/// # Errors
/// Returns an error if the transaction record could not be read.
pub fn get_transaction_by_id(
    id: &TransactionId,
    session: &Session,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    get_transactions(session, connection)
        .map(|transactions| transactions.into_iter().find(|transaction| &transaction.id == id))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        storage::{TRANSACTIONS_KEY, set_item},
        transaction::{Transaction, TransactionId, TransactionType},
        log_out::log_out,
        user::{Session, User, log_in, register_user},
    };

    use super::{
        add_transaction, delete_transaction, get_transaction_by_id, get_transactions,
        update_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn log_in_as(email: &str, conn: &Connection) -> Session {
        register_user(
            User {
                name: email.to_owned(),
                email: email.to_owned(),
                password: "hunter2".to_owned(),
            },
            conn,
        )
        .unwrap();

        log_in(email, "hunter2", conn).unwrap().unwrap()
    }

    fn create_test_transaction(id: &str, amount: f64) -> Transaction {
        Transaction::build(TransactionType::Expense, "Food", amount, date!(2024 - 01 - 15))
            .id(TransactionId::new(id))
            .description("groceries")
            .finalise()
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions
            .iter()
            .map(|transaction| transaction.id.as_str())
            .collect()
    }

    #[test]
    fn get_transactions_is_empty_for_new_user() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);

        assert_eq!(get_transactions(&session, &conn), Ok(vec![]));
    }

    #[test]
    fn add_then_get_by_id_round_trips() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);
        let transaction = create_test_transaction("1", 12.3);

        add_transaction(transaction.clone(), &session, &conn).unwrap();

        assert_eq!(
            get_transaction_by_id(&transaction.id, &session, &conn),
            Ok(Some(transaction))
        );
    }

    #[test]
    fn add_keeps_insertion_order() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);

        for (id, amount) in [("3", 30.0), ("1", 10.0), ("2", 20.0)] {
            add_transaction(create_test_transaction(id, amount), &session, &conn).unwrap();
        }

        let ids: Vec<_> = get_transactions(&session, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.id.to_string())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn update_replaces_matching_transaction() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);
        add_transaction(create_test_transaction("1", 10.0), &session, &conn).unwrap();
        add_transaction(create_test_transaction("2", 20.0), &session, &conn).unwrap();
        let updated = create_test_transaction("1", 99.0);

        let did_update = update_transaction(updated.clone(), &session, &conn).unwrap();

        assert!(did_update);
        let transactions = get_transactions(&session, &conn).unwrap();
        assert_eq!(transactions[0], updated);
        assert_eq!(transactions[1].amount, 20.0);
    }

    #[test]
    fn update_with_missing_id_changes_nothing() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);
        add_transaction(create_test_transaction("1", 10.0), &session, &conn).unwrap();
        let before = get_transactions(&session, &conn).unwrap();

        let did_update =
            update_transaction(create_test_transaction("404", 1.0), &session, &conn).unwrap();

        assert!(!did_update);
        assert_eq!(get_transactions(&session, &conn).unwrap(), before);
    }

    #[test]
    fn delete_removes_matching_transaction() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);
        add_transaction(create_test_transaction("1", 10.0), &session, &conn).unwrap();
        add_transaction(create_test_transaction("2", 20.0), &session, &conn).unwrap();

        let did_delete = delete_transaction(&TransactionId::new("1"), &session, &conn).unwrap();

        assert!(did_delete);
        let transactions = get_transactions(&session, &conn).unwrap();
        assert_eq!(transactions, vec![create_test_transaction("2", 20.0)]);
    }

    #[test]
    fn delete_with_missing_id_changes_nothing() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);
        add_transaction(create_test_transaction("1", 10.0), &session, &conn).unwrap();
        let before = get_transactions(&session, &conn).unwrap();

        let did_delete = delete_transaction(&TransactionId::new("404"), &session, &conn).unwrap();

        assert!(!did_delete);
        assert_eq!(get_transactions(&session, &conn).unwrap(), before);
    }

    #[test]
    fn users_only_see_their_own_transactions() {
        let conn = get_test_connection();
        let alice = log_in_as("alice@x.com", &conn);
        add_transaction(create_test_transaction("1", 10.0), &alice, &conn).unwrap();
        let bob = log_in_as("bob@x.com", &conn);

        add_transaction(create_test_transaction("2", 20.0), &bob, &conn).unwrap();
        let deleted_other_users =
            delete_transaction(&TransactionId::new("1"), &bob, &conn).unwrap();

        assert!(!deleted_other_users);
        assert_eq!(ids(&get_transactions(&bob, &conn).unwrap()), vec!["2"]);
        assert_eq!(
            get_transaction_by_id(&TransactionId::new("1"), &bob, &conn).unwrap(),
            None
        );

        let alice = log_in(alice.email(), "hunter2", &conn).unwrap().unwrap();
        assert_eq!(ids(&get_transactions(&alice, &conn).unwrap()), vec!["1"]);
    }

    #[test]
    fn session_stops_working_after_log_out() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);
        add_transaction(create_test_transaction("1", 10.0), &session, &conn).unwrap();

        log_out(&conn).unwrap();
        add_transaction(create_test_transaction("2", 20.0), &session, &conn).unwrap();
        let did_update =
            update_transaction(create_test_transaction("1", 99.0), &session, &conn).unwrap();
        let did_delete = delete_transaction(&TransactionId::new("1"), &session, &conn).unwrap();

        assert!(!did_update);
        assert!(!did_delete);
        assert_eq!(get_transactions(&session, &conn), Ok(vec![]));

        let session = log_in(session.email(), "hunter2", &conn).unwrap().unwrap();
        assert_eq!(
            get_transactions(&session, &conn),
            Ok(vec![create_test_transaction("1", 10.0)])
        );
    }

    #[test]
    fn corrupt_transaction_record_is_reported() {
        let conn = get_test_connection();
        let session = log_in_as("a@x.com", &conn);
        set_item(TRANSACTIONS_KEY, "[1, 2", &conn).unwrap();

        let result = get_transactions(&session, &conn);

        assert!(matches!(result, Err(Error::CorruptRecord { .. })));
    }
}
