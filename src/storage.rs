//! A key-value store of text records, modelled after browser local storage.
//!
//! Records are plain JSON text stored under a fixed key. Reading a record
//! that does not exist yields the type's default value, so a fresh database
//! behaves exactly like "no users, no session, no transactions".
//! Every write replaces the whole record.

use rusqlite::{Connection, OptionalExtension};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// The key of the record holding every registered user.
pub const USERS_KEY: &str = "pft_users";
/// The key of the record holding the active session.
pub const CURRENT_USER_KEY: &str = "pft_current_user";
/// The key of the record holding every user's transactions, keyed by email.
pub const TRANSACTIONS_KEY: &str = "pft_transactions";

/// Create the local storage table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_local_storage_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Get the raw text stored under `key`, or `None` if nothing is stored there.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_item(key: &str, connection: &Connection) -> Result<Option<String>, Error> {
    connection
        .prepare("SELECT value FROM local_storage WHERE key = :key")?
        .query_row(&[(":key", key)], |row| row.get(0))
        .optional()
        .map_err(|error| error.into())
}

/// Store `value` under `key`, replacing any existing value.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn set_item(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key, value),
    )?;

    Ok(())
}

/// Remove the value stored under `key`. Removing a missing key does nothing.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn remove_item(key: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM local_storage WHERE key = ?1", (key,))?;

    Ok(())
}

/// Read and deserialize the record stored under `key`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::CorruptRecord] if the stored text is not valid JSON for `T`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn load_record<T: DeserializeOwned>(
    key: &str,
    connection: &Connection,
) -> Result<Option<T>, Error> {
    let Some(raw) = get_item(key, connection)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|error| Error::CorruptRecord {
            key: key.to_owned(),
            reason: error.to_string(),
        })
}

/// Read the record stored under `key`, falling back to `T::default()` when absent.
///
/// # Errors
///
/// See [load_record].
pub fn load_record_or_default<T: DeserializeOwned + Default>(
    key: &str,
    connection: &Connection,
) -> Result<T, Error> {
    load_record(key, connection).map(Option::unwrap_or_default)
}

/// Serialize `record` as JSON and store it under `key`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::JSONSerializationError] if `record` could not be serialized,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn save_record<T: Serialize + ?Sized>(
    key: &str,
    record: &T,
    connection: &Connection,
) -> Result<(), Error> {
    let raw = serde_json::to_string(record)?;
    set_item(key, &raw, connection)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{
        get_item, load_record, load_record_or_default, remove_item, save_record, set_item,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn get_item_returns_none_for_missing_key() {
        let conn = get_test_connection();

        assert_eq!(get_item("missing", &conn), Ok(None));
    }

    #[test]
    fn set_item_overwrites_existing_value() {
        let conn = get_test_connection();

        set_item("greeting", "hello", &conn).unwrap();
        set_item("greeting", "goodbye", &conn).unwrap();

        assert_eq!(get_item("greeting", &conn), Ok(Some("goodbye".to_owned())));
    }

    #[test]
    fn remove_item_is_idempotent() {
        let conn = get_test_connection();
        set_item("greeting", "hello", &conn).unwrap();

        remove_item("greeting", &conn).unwrap();
        remove_item("greeting", &conn).unwrap();

        assert_eq!(get_item("greeting", &conn), Ok(None));
    }

    #[test]
    fn load_record_or_default_returns_default_when_absent() {
        let conn = get_test_connection();

        let record: Vec<String> = load_record_or_default("names", &conn).unwrap();

        assert!(record.is_empty());
    }

    #[test]
    fn save_then_load_record() {
        let conn = get_test_connection();
        let mut record = BTreeMap::new();
        record.insert("a@x.com".to_owned(), vec![1, 2, 3]);

        save_record("numbers", &record, &conn).unwrap();
        let loaded: Option<BTreeMap<String, Vec<i32>>> = load_record("numbers", &conn).unwrap();

        assert_eq!(loaded, Some(record));
    }

    #[test]
    fn load_record_fails_on_corrupt_text() {
        let conn = get_test_connection();
        set_item("names", "[\"unterminated", &conn).unwrap();

        let result: Result<Vec<String>, Error> = load_record_or_default("names", &conn);

        assert!(
            matches!(result, Err(Error::CorruptRecord { ref key, .. }) if key == "names"),
            "want corrupt record error, got {result:?}"
        );
    }
}
