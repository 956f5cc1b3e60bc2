//! Stream registry: stream handle → timeline entry
//!
//! Entries are only ever removed by explicit lifecycle events (stop, unload
//! of the owning sound, release). A single mutex serialises structural
//! changes and whole-registry scans against each other; per-entry updates
//! run under the same lock, so every observation of an entry is consistent.

use crate::handle::{SoundId, StreamId};
use crate::timeline::StreamEntry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe map of live stream entries
#[derive(Debug, Default)]
pub struct StreamRegistry {
    entries: Mutex<HashMap<StreamId, StreamEntry>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries are plain data; a panic elsewhere cannot leave one half-built
    fn lock(&self) -> MutexGuard<'_, HashMap<StreamId, StreamEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the entry for its stream handle
    pub fn insert(&self, entry: StreamEntry) -> Option<StreamEntry> {
        self.lock().insert(entry.stream(), entry)
    }

    pub fn remove(&self, stream: StreamId) -> Option<StreamEntry> {
        self.lock().remove(&stream)
    }

    /// Run `f` on the entry for `stream`; `None` if the handle is unknown
    pub fn with_entry<R>(&self, stream: StreamId, f: impl FnOnce(&mut StreamEntry) -> R) -> Option<R> {
        self.lock().get_mut(&stream).map(f)
    }

    /// Remove every entry belonging to `sound`, playing or not
    ///
    /// Returns the handles of the removed entries.
    pub fn remove_sound(&self, sound: SoundId) -> Vec<StreamId> {
        let mut removed = Vec::new();
        self.lock().retain(|stream, entry| {
            if entry.sound() == sound {
                removed.push(*stream);
                false
            } else {
                true
            }
        });
        removed
    }

    /// True if `f` holds for any entry of `sound`
    pub fn any_for_sound(&self, sound: SoundId, mut f: impl FnMut(&mut StreamEntry) -> bool) -> bool {
        self.lock()
            .values_mut()
            .filter(|entry| entry.sound() == sound)
            .any(|entry| f(entry))
    }

    /// Visit every entry
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut StreamEntry)) {
        for entry in self.lock().values_mut() {
            f(entry);
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}
