//! Per-visitor sessions, each owning its own transaction store.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::transaction::TransactionStore;

/// How long a session may go without a request before it is discarded.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::minutes(60);

/// An opaque, unguessable identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The data owned by a single session.
#[derive(Debug, Clone)]
pub struct Session {
    pub store: TransactionStore,
    pub last_seen: OffsetDateTime,
}

/// All live sessions, keyed by ID.
///
/// Sessions are created lazily on a visitor's first request and are removed
/// either explicitly with [SessionRegistry::end] or after going idle for
/// longer than the registry's timeout.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
        }
    }

    /// Start a new session with an empty store.
    pub fn create(&mut self, now: OffsetDateTime) -> SessionId {
        let id = SessionId::new_random();

        self.sessions.insert(
            id,
            Session {
                store: TransactionStore::new(),
                last_seen: now,
            },
        );

        id
    }

    /// Mark the session `id` as active at `now`.
    ///
    /// Returns `false` if there is no such session or it has been idle for
    /// longer than the timeout, in which case it is removed.
    pub fn touch(&mut self, id: SessionId, now: OffsetDateTime) -> bool {
        let idle_timeout = self.idle_timeout;

        match self.sessions.get_mut(&id) {
            Some(session) if now - session.last_seen <= idle_timeout => {
                session.last_seen = now;
                true
            }
            Some(_) => {
                self.sessions.remove(&id);
                false
            }
            None => false,
        }
    }

    pub fn store(&self, id: SessionId) -> Option<&TransactionStore> {
        self.sessions.get(&id).map(|session| &session.store)
    }

    pub fn store_mut(&mut self, id: SessionId) -> Option<&mut TransactionStore> {
        self.sessions.get_mut(&id).map(|session| &mut session.store)
    }

    /// Discard the session `id` and all of its transactions.
    ///
    /// Returns `false` if there was no such session.
    pub fn end(&mut self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Remove every session that has been idle for longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn evict_idle(&mut self, now: OffsetDateTime) -> usize {
        let idle_timeout = self.idle_timeout;
        let before = self.sessions.len();

        self.sessions
            .retain(|_, session| now - session.last_seen <= idle_timeout);

        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
