//! Finance Tracker is a small personal finance tracker.
//!
//! Users register and log in, record income and expense transactions, and
//! view filtered and sorted transaction lists along with summaries and charts.
//! Everything is persisted as JSON records in a key-value "local storage"
//! table inside an SQLite database.

#![warn(missing_docs)]

pub mod dashboard;
pub mod db;
pub mod form;
pub mod html;
pub mod log_in;
pub mod log_out;
pub mod logging;
pub mod register_user;
pub mod storage;
pub mod timezone;
pub mod transaction;
pub mod user;

pub use db::initialize as initialize_db;
pub use form::FieldError;
pub use user::{NewUser, Session, User};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A user with the same email address has already registered.
    #[error("Email already registered")]
    DuplicateEmail,

    /// A stored record could not be read back.
    ///
    /// Records are never validated on write, so this usually means the
    /// database was edited by hand or written by an incompatible version.
    #[error("the stored record \"{key}\" is corrupt: {reason}")]
    CorruptRecord {
        /// The storage key of the record.
        key: String,
        /// Why deserialization failed.
        reason: String,
    },

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The HTML report could not be written to disk.
    #[error("could not write the report to {path}: {reason}")]
    ReportWriteError {
        /// Where the report was meant to be written.
        path: String,
        /// The underlying I/O error message.
        reason: String,
    },
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}
