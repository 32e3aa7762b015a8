//! Per-session bibliography storage.
//!
//! Each browser session, identified by a random cookie, owns its own
//! bibliography slot. Concurrent sessions can upload and query different
//! bibliographies without clobbering each other. An upload replaces the
//! session's bibliography wholesale; a failed load clears the slot so no
//! partial state survives. Stale sessions are purged by TTL on each store.

use crate::models::Bibliography;
use crate::SESSION_TTL_HOURS;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "citeview_session";

struct Slot {
    bibliography: Arc<Bibliography>,
    created: DateTime<Utc>,
}

/// In-memory session → bibliography map. The mutex guards only map access;
/// it is never held across an await point.
#[derive(Default)]
pub struct BibStore {
    slots: Mutex<HashMap<String, Slot>>,
}

/// Generate a fresh session id (alphanumeric, 32 chars).
pub fn new_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

impl BibStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly loaded bibliography for a session, replacing whatever
    /// the session held before. Also drops sessions past their TTL.
    pub fn store(&self, session_id: &str, bibliography: Bibliography) {
        let cutoff = Utc::now() - Duration::hours(SESSION_TTL_HOURS);
        let mut slots = self.slots.lock().expect("bib store mutex poisoned");
        slots.retain(|_, slot| slot.created > cutoff);
        slots.insert(
            session_id.to_string(),
            Slot {
                bibliography: Arc::new(bibliography),
                created: Utc::now(),
            },
        );
    }

    /// Clear a session's bibliography entirely (failed or missing upload).
    pub fn clear(&self, session_id: &str) {
        let mut slots = self.slots.lock().expect("bib store mutex poisoned");
        slots.remove(session_id);
    }

    /// The bibliography currently loaded for a session, if any.
    pub fn get(&self, session_id: &str) -> Option<Arc<Bibliography>> {
        let slots = self.slots.lock().expect("bib store mutex poisoned");
        slots.get(session_id).map(|slot| slot.bibliography.clone())
    }

    #[cfg(test)]
    pub fn session_count(&self) -> usize {
        self.slots.lock().expect("bib store mutex poisoned").len()
    }
}
