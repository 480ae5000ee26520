//! Ends the current session.

use rusqlite::Connection;

use crate::{
    Error,
    user::{Session, clear_session, get_current_user},
};

/// Clear the stored session and return who was logged out.
///
/// Logging out is idempotent: when nobody is logged in this returns `None`
/// and leaves storage as it was. The session record is removed even if it
/// cannot be read, in which case `None` is returned.
///
/// Any [Session] value obtained before logging out stops working with the
/// transaction store.
///
/// # Errors
///
/// Returns an error if the session record could not be removed.
pub fn log_out(connection: &Connection) -> Result<Option<Session>, Error> {
    let session = get_current_user(connection).unwrap_or_else(|error| {
        tracing::warn!("discarding unreadable session record: {error}");
        None
    });

    clear_session(connection)?;

    if let Some(session) = &session {
        tracing::info!("{} logged out", session.email());
    }

    Ok(session)
}
