//! Storing the session ID in an encrypted cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{endpoints, session::SessionId};

pub(crate) const COOKIE_SESSION_ID: &str = "session_id";

/// Add the session cookie to `jar`.
///
/// The cookie has no expiry, so it lasts until the browser is closed. The
/// server forgets idle sessions on its own, which makes a stale cookie harmless.
pub(crate) fn set_session_cookie(jar: PrivateCookieJar, session_id: SessionId) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION_ID, session_id.to_string()))
            .path(endpoints::ROOT)
            .http_only(true)
            .same_site(SameSite::Strict),
    )
}

/// The session ID stored in `jar`, if present and well formed.
pub(crate) fn get_session_id(jar: &PrivateCookieJar) -> Option<SessionId> {
    let cookie = jar.get(COOKIE_SESSION_ID)?;

    match cookie.value().parse() {
        Ok(session_id) => Some(session_id),
        Err(error) => {
            tracing::warn!("Ignoring malformed session cookie: {error}");
            None
        }
    }
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION_ID, "deleted"))
            .path(endpoints::ROOT)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict),
    )
}
