//! Sets up the SQLite database that backs the application's local storage.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::storage::create_local_storage_table;

/// Create all the tables the application needs.
///
/// Calling this on an already initialised database is a no-op.
///
/// # Errors
/// Returns an error if the tables could not be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_local_storage_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
