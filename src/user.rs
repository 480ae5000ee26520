//! Code for registering users, and for creating and reading the session record.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    storage::{
        CURRENT_USER_KEY, USERS_KEY, load_record, load_record_or_default, remove_item, save_record,
    },
};

/// A registered user of the application.
///
/// Passwords are kept in plaintext. This application is a demo and makes no
/// attempt at real authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's display name.
    pub name: String,
    /// The user's email address, which also identifies the user.
    pub email: String,
    /// The user's password.
    pub password: String,
}

/// The details needed to register a new user.
pub type NewUser = User;

/// The currently logged in user, without their password.
///
/// A session can only be obtained by logging in with [log_in] or by reading
/// the stored session with [get_current_user]. Operations that act on behalf of
/// a user take a `&Session`, so they cannot run without somebody logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    name: String,
    email: String,
}

impl Session {
    /// The logged in user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The logged in user's email address.
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

fn get_users(connection: &Connection) -> Result<Vec<User>, Error> {
    load_record_or_default(USERS_KEY, connection)
}

/// Register a new user.
///
/// Emails are compared exactly, so `A@x.com` and `a@x.com` are different users.
///
/// # Errors
///
/// This function will return a:
/// - [Error::DuplicateEmail] if a user with the same email has already registered,
/// - or [Error::CorruptRecord] or [Error::SqlError] if the user record could not be read or
///   written.
pub fn register_user(new_user: NewUser, connection: &Connection) -> Result<(), Error> {
    let mut users = get_users(connection)?;

    if users.iter().any(|user| user.email == new_user.email) {
        tracing::warn!("rejected registration for an email that is already in use");
        return Err(Error::DuplicateEmail);
    }

    tracing::info!("registering user {}", new_user.email);
    users.push(new_user);
    save_record(USERS_KEY, &users, connection)
}

/// Log in as the user with a matching `email` and `password`.
///
/// On success the session is stored and returned. On failure `None` is
/// returned and any existing session is left as is. The caller cannot tell
/// whether the email or the password was wrong.
///
/// # Errors
///
/// Returns an error if the user or session records could not be read or written.
pub fn log_in(
    email: &str,
    password: &str,
    connection: &Connection,
) -> Result<Option<Session>, Error> {
    let users = get_users(connection)?;

    let Some(user) = users
        .iter()
        .find(|user| user.email == email && user.password == password)
    else {
        tracing::warn!("failed log in attempt");
        return Ok(None);
    };

    let session = Session::from(user);
    save_record(CURRENT_USER_KEY, &session, connection)?;
    tracing::info!("{} logged in", session.email);

    Ok(Some(session))
}

/// Get the currently logged in user, if any.
///
/// # Errors
///
/// Returns an error if the session record could not be read.
pub fn get_current_user(connection: &Connection) -> Result<Option<Session>, Error> {
    load_record(CURRENT_USER_KEY, connection)
}

/// Whether somebody is currently logged in.
///
/// # Errors
///
/// Returns an error if the session record could not be read.
pub fn is_authenticated(connection: &Connection) -> Result<bool, Error> {
    get_current_user(connection).map(|session| session.is_some())
}

/// Clear the stored session. Logging out when nobody is logged in does nothing.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn clear_session(connection: &Connection) -> Result<(), Error> {
    remove_item(CURRENT_USER_KEY, connection)
}

/// Get the number of registered users.
///
/// # Errors
///
/// Returns an error if the user record could not be read.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    get_users(connection).map(|users| users.len())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        storage::{USERS_KEY, get_item, set_item},
    };

    use super::{
        User, clear_session, count_users, get_current_user, get_users, is_authenticated, log_in,
        register_user,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&conn).expect("Could not create local storage table");

        conn
    }

    fn test_user(email: &str, password: &str) -> User {
        User {
            name: "Alice".to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn register_user_succeeds() {
        let conn = get_db_connection();

        register_user(test_user("a@x.com", "p"), &conn).unwrap();

        assert_eq!(get_users(&conn).unwrap(), vec![test_user("a@x.com", "p")]);
    }

    #[test]
    fn register_user_fails_with_duplicate_email() {
        let conn = get_db_connection();
        register_user(test_user("a@x.com", "p"), &conn).unwrap();

        let result = register_user(test_user("a@x.com", "q"), &conn);

        assert_eq!(result, Err(Error::DuplicateEmail));
        let users = get_users(&conn).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].password, "p", "first record's password should be unchanged");
    }

    #[test]
    fn register_user_compares_email_case_sensitively() {
        let conn = get_db_connection();
        register_user(test_user("a@x.com", "p"), &conn).unwrap();

        register_user(test_user("A@x.com", "p"), &conn).unwrap();

        assert_eq!(count_users(&conn).unwrap(), 2);
    }

    #[test]
    fn log_in_with_no_matching_user_returns_none() {
        let conn = get_db_connection();

        let session = log_in("a@x.com", "p", &conn).unwrap();

        assert_eq!(session, None);
        assert_eq!(get_current_user(&conn).unwrap(), None);
    }

    #[test]
    fn log_in_with_wrong_password_returns_none() {
        let conn = get_db_connection();
        register_user(test_user("a@x.com", "p"), &conn).unwrap();

        let session = log_in("a@x.com", "wrong", &conn).unwrap();

        assert_eq!(session, None);
        assert!(!is_authenticated(&conn).unwrap());
    }

    #[test]
    fn log_in_stores_session_without_password() {
        let conn = get_db_connection();
        register_user(test_user("a@x.com", "p"), &conn).unwrap();

        let session = log_in("a@x.com", "p", &conn).unwrap().unwrap();

        assert_eq!(session.name(), "Alice");
        assert_eq!(session.email(), "a@x.com");
        assert_eq!(get_current_user(&conn).unwrap(), Some(session));
        let raw_session = get_item(super::CURRENT_USER_KEY, &conn).unwrap().unwrap();
        assert!(
            !raw_session.contains("password"),
            "stored session should not contain the password, got {raw_session}"
        );
    }

    #[test]
    fn failed_log_in_keeps_existing_session() {
        let conn = get_db_connection();
        register_user(test_user("a@x.com", "p"), &conn).unwrap();
        let session = log_in("a@x.com", "p", &conn).unwrap();

        log_in("a@x.com", "wrong", &conn).unwrap();

        assert_eq!(get_current_user(&conn).unwrap(), session);
    }

    #[test]
    fn clear_session_twice_equals_once() {
        let conn = get_db_connection();
        register_user(test_user("a@x.com", "p"), &conn).unwrap();
        log_in("a@x.com", "p", &conn).unwrap();

        clear_session(&conn).unwrap();
        let after_first = get_current_user(&conn).unwrap();
        clear_session(&conn).unwrap();
        let after_second = get_current_user(&conn).unwrap();

        assert_eq!(after_first, None);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn corrupt_user_record_is_reported() {
        let conn = get_db_connection();
        set_item(USERS_KEY, "{not json", &conn).unwrap();

        let result = log_in("a@x.com", "p", &conn);

        assert!(matches!(result, Err(Error::CorruptRecord { .. })));
    }

    #[test]
    fn returns_correct_count() {
        let conn = get_db_connection();

        let count = count_users(&conn).expect("Could not get user count");
        assert_eq!(0, count, "Want zero users before registration, got {count}");

        register_user(test_user("a@x.com", "p"), &conn).unwrap();

        let count = count_users(&conn).expect("Could not get user count");
        assert_eq!(1, count, "Want one user after registration, got {count}");
    }
}
