use std::collections::HashMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use tokio::sync::Mutex;
use uuid::Uuid;

use intake_core::store::FormStore;
use intake_export::styles::DocumentStyles;

use crate::submission::{FormRepository, Notifier};

/// Sessions untouched for this long are dropped on the next sweep.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_hours(2);

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<dyn FormRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub sessions: Arc<Mutex<Sessions>>,
    pub styles: Arc<DocumentStyles>,
}

impl AppState {
    pub fn new(forms: Arc<dyn FormRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_session_ttl(forms, notifier, DEFAULT_SESSION_TTL)
    }

    pub fn with_session_ttl(
        forms: Arc<dyn FormRepository>,
        notifier: Arc<dyn Notifier>,
        ttl: SignedDuration,
    ) -> Self {
        Self {
            forms,
            notifier,
            sessions: Arc::new(Mutex::new(Sessions::new(ttl))),
            styles: Arc::new(DocumentStyles::default()),
        }
    }
}

struct Session {
    store: FormStore,
    touched: Timestamp,
}

/// Open forms by session id. Every access refreshes the session's
/// last-touched time; sessions idle past the TTL are treated as gone.
pub struct Sessions {
    open: HashMap<Uuid, Session>,
    ttl: SignedDuration,
}

impl Sessions {
    pub fn new(ttl: SignedDuration) -> Self {
        Self {
            open: HashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn insert(&mut self, id: Uuid, store: FormStore, now: Timestamp) {
        self.open.insert(id, Session { store, touched: now });
    }

    /// The live session's store, marked as touched at `now`.
    pub fn get_mut(&mut self, id: Uuid, now: Timestamp) -> Option<&mut FormStore> {
        if self.open.get(&id).is_some_and(|s| self.expired(s, now)) {
            self.open.remove(&id);
            return None;
        }
        let session = self.open.get_mut(&id)?;
        session.touched = now;
        Some(&mut session.store)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<FormStore> {
        self.open.remove(&id).map(|s| s.store)
    }

    /// Drop every expired session. Returns how many were dropped.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let before = self.open.len();
        let ttl = self.ttl;
        self.open.retain(|_, s| now.duration_since(s.touched) <= ttl);
        before - self.open.len()
    }

    fn expired(&self, session: &Session, now: Timestamp) -> bool {
        now.duration_since(session.touched) > self.ttl
    }
}
