//! Session middleware that attaches every request to a session, creating one if needed.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HX_REQUEST;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    internal_server_error::get_internal_server_error_redirect,
    session::{
        SessionId, SessionRegistry,
        cookie::{get_session_id, set_session_cookie},
    },
};

/// The state needed for the session middleware and the end session endpoint.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// Every live session.
    pub sessions: Arc<Mutex<SessionRegistry>>,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            sessions: state.sessions.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that resolves the session for the request.
///
/// A request whose cookie names a live session continues that session.
/// Otherwise, i.e. the cookie is missing, tampered with or refers to a
/// session that has ended or gone idle, a new empty session is started and
/// its cookie is added to the response.
///
/// Idle sessions are evicted on every request.
///
/// If the session cannot be resolved, HTMX requests are redirected to the
/// error page with the `HX-Redirect` header and full page loads get the error
/// page directly.
///
/// **Note**: Route handlers can use the function argument `Extension(session_id): Extension<SessionId>` to receive the session ID.
pub async fn session_guard(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let is_htmx_request = parts.headers.contains_key(HX_REQUEST);
    let error_response = || {
        if is_htmx_request {
            get_internal_server_error_redirect()
        } else {
            Error::SessionLockError.into_response()
        }
    };

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}");
            return error_response();
        }
    };

    let (session_id, is_new) = {
        let mut sessions = match state.sessions.lock() {
            Ok(sessions) => sessions,
            Err(error) => {
                tracing::error!("could not acquire session lock: {error}");
                return error_response();
            }
        };
        let now = OffsetDateTime::now_utc();

        let evicted = sessions.evict_idle(now);
        if evicted > 0 {
            tracing::info!("Discarded {evicted} idle session(s)");
        }

        resolve_session(&mut sessions, get_session_id(&jar), now)
    };

    parts.extensions.insert(session_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    if !is_new {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let jar = set_session_cookie(jar, session_id);
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Continue the session `cookie_session_id` if it is still live, otherwise start a new one.
///
/// Returns the session ID and whether it was newly created.
fn resolve_session(
    sessions: &mut SessionRegistry,
    cookie_session_id: Option<SessionId>,
    now: OffsetDateTime,
) -> (SessionId, bool) {
    match cookie_session_id {
        Some(session_id) if sessions.touch(session_id, now) => (session_id, false),
        Some(session_id) => {
            tracing::info!("Session {session_id} has ended or expired, starting a new session");
            (sessions.create(now), true)
        }
        None => {
            let session_id = sessions.create(now);
            tracing::info!("Started new session {session_id}");
            (session_id, true)
        }
    }
}
