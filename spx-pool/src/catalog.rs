//! Sound catalog: sound handle → nominal duration
//!
//! Filled once per load and emptied on unload. Entries are never updated in
//! place.

use crate::handle::SoundId;
use std::collections::HashMap;

/// Nominal single-pass durations of loaded sounds (ms, 0 if unknown)
#[derive(Debug, Default)]
pub struct SoundCatalog {
    durations: HashMap<SoundId, u32>,
}

impl SoundCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly loaded sound
    pub fn insert(&mut self, sound: SoundId, duration_ms: u32) {
        self.durations.insert(sound, duration_ms);
    }

    /// Forget an unloaded sound, returning its duration if it was known
    pub fn remove(&mut self, sound: SoundId) -> Option<u32> {
        self.durations.remove(&sound)
    }

    /// Duration of `sound`, 0 if unknown or not loaded
    pub fn duration(&self, sound: SoundId) -> u32 {
        self.durations.get(&sound).copied().unwrap_or(0)
    }

    pub fn contains(&self, sound: SoundId) -> bool {
        self.durations.contains_key(&sound)
    }

    pub fn clear(&mut self) {
        self.durations.clear();
    }
}
