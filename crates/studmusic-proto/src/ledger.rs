//! Recently-played ledger: most recent first, unique by track id, capped.
//!
//! The ledger keeps no copy of its own; every read goes to the injected
//! store, so two ledgers over the same store always agree.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::Track;
use crate::storage::{KeyValueStore, StoreError};

/// Storage key for the serialized ledger.
pub const LEDGER_KEY: &str = "recentlyPlayed";
pub const LEDGER_CAPACITY: usize = 20;

pub struct RecentlyPlayed {
    store: Arc<dyn KeyValueStore>,
}

impl RecentlyPlayed {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted entries, or `None` when nothing has been written yet (or the
    /// stored value cannot be read back).
    fn load(&self) -> Option<Vec<Track>> {
        let raw = match self.store.get(LEDGER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("[ledger] store read failed: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<Vec<Track>>(&raw) {
            Ok(tracks) => Some(tracks),
            Err(e) => {
                warn!("[ledger] discarding corrupt ledger: {}", e);
                None
            }
        }
    }

    /// Current entries; empty when no ledger exists.
    pub fn entries(&self) -> Vec<Track> {
        self.load().unwrap_or_default()
    }

    /// Current entries, or `fallback` when no ledger has been persisted.
    pub fn list(&self, fallback: &[Track]) -> Vec<Track> {
        self.load().unwrap_or_else(|| fallback.to_vec())
    }

    /// Move `track` to the front and persist with a single store write.
    ///
    /// Returns the new ledger. On a write failure the error is returned and
    /// the stored ledger is left as it was.
    pub fn record(&self, track: &Track) -> Result<Vec<Track>, StoreError> {
        let mut entries = self.entries();
        push_front_unique(&mut entries, track.clone(), LEDGER_CAPACITY);

        let json = serde_json::to_string(&entries)?;
        self.store.set(LEDGER_KEY, &json)?;
        debug!("[ledger] recorded id={} len={}", track.id, entries.len());
        Ok(entries)
    }
}

/// Remove any entry sharing `track.id`, prepend `track`, keep at most `cap`.
pub fn push_front_unique(entries: &mut Vec<Track>, track: Track, cap: usize) {
    entries.retain(|t| t.id != track.id);
    entries.insert(0, track);
    entries.truncate(cap);
}
