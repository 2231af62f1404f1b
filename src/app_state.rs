//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, session::SessionRegistry, stylesheet::Stylesheet, timezone::get_local_offset};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Every live session and its transactions.
    pub sessions: Arc<Mutex<SessionRegistry>>,

    /// The stylesheet served to every page.
    pub stylesheet: Stylesheet,
}

impl AppState {
    /// Create a new [AppState] with no sessions.
    ///
    /// If `cookie_secret` is `None`, a random key is generated and cookies
    /// issued before a restart can no longer be read. Their sessions are gone
    /// after a restart anyway.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    /// Sessions that have not seen a request for `idle_timeout` are discarded.
    ///
    /// # Errors
    /// Returns an [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(
        cookie_secret: Option<&str>,
        local_timezone: &str,
        idle_timeout: Duration,
        stylesheet: Stylesheet,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        let cookie_key = match cookie_secret {
            Some(secret) => create_cookie_key(secret),
            None => Key::generate(),
        };

        Ok(Self {
            cookie_key,
            local_timezone: local_timezone.to_owned(),
            sessions: Arc::new(Mutex::new(SessionRegistry::new(idle_timeout))),
            stylesheet,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
