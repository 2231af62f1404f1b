//! Session handling: every visitor gets an isolated, in-memory transaction
//! store that lives until the session is ended or goes idle.

mod cookie;
mod end_endpoint;
mod middleware;
mod registry;

use std::sync::{Arc, Mutex};

pub use end_endpoint::get_end_session;
pub use middleware::{SessionState, session_guard};
pub use registry::{DEFAULT_IDLE_TIMEOUT, SessionId, SessionRegistry};

use crate::{Error, transaction::TransactionStore};

/// Run `f` with read access to the transaction store of `session_id`.
///
/// # Errors
/// Returns a:
/// - [Error::SessionLockError] if the session lock is poisoned,
/// - [Error::SessionNotFound] if the session has ended.
pub fn with_store<T>(
    sessions: &Arc<Mutex<SessionRegistry>>,
    session_id: SessionId,
    f: impl FnOnce(&TransactionStore) -> T,
) -> Result<T, Error> {
    let sessions = sessions.lock().map_err(|error| {
        tracing::error!("could not acquire session lock: {error}");
        Error::SessionLockError
    })?;
    let store = sessions.store(session_id).ok_or_else(|| {
        tracing::error!("session {session_id} was not found");
        Error::SessionNotFound
    })?;

    Ok(f(store))
}

/// Run `f` with write access to the transaction store of `session_id`.
///
/// # Errors
/// Returns a:
/// - [Error::SessionLockError] if the session lock is poisoned,
/// - [Error::SessionNotFound] if the session has ended.
pub fn with_store_mut<T>(
    sessions: &Arc<Mutex<SessionRegistry>>,
    session_id: SessionId,
    f: impl FnOnce(&mut TransactionStore) -> T,
) -> Result<T, Error> {
    let mut sessions = sessions.lock().map_err(|error| {
        tracing::error!("could not acquire session lock: {error}");
        Error::SessionLockError
    })?;
    let store = sessions.store_mut(session_id).ok_or_else(|| {
        tracing::error!("session {session_id} was not found");
        Error::SessionNotFound
    })?;

    Ok(f(store))
}
