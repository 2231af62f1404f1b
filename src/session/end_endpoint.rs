//! Ending a session, which discards all of its transactions.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error, endpoints,
    session::{
        SessionState,
        cookie::{get_session_id, invalidate_session_cookie},
    },
};

/// Discard the current session, expire its cookie and redirect the client to
/// the dashboard, where a fresh, empty session starts.
pub async fn get_end_session(State(state): State<SessionState>, jar: PrivateCookieJar) -> Response {
    if let Some(session_id) = get_session_id(&jar) {
        let mut sessions = match state.sessions.lock() {
            Ok(sessions) => sessions,
            Err(error) => {
                tracing::error!("could not acquire session lock: {error}");
                return Error::SessionLockError.into_response();
            }
        };

        if sessions.end(session_id) {
            tracing::info!("Ended session {session_id}");
        }
    }

    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}
