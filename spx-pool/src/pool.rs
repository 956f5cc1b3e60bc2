//! Sound pool facade
//!
//! [`SoundPoolEx`] wraps an [`AudioEngine`] and keeps derived playback state
//! in step with it. Every command goes to the engine first; once the engine
//! has accepted it, the same command is applied to the tracker. Queries
//! (`is_playing`, `get_stream_duration`, ...) are answered by the tracker
//! alone.
//!
//! Unknown handles are expected (the engine recycles streams on its own) and
//! are never errors: commands become no-ops, queries report false/0.

use crate::catalog::SoundCatalog;
use crate::engine::{AudioEngine, SoundSource};
use crate::error::{Error, Result};
use crate::handle::{Priority, SoundId, StereoVolume, StreamId};
use crate::probe::{DurationProbe, SymphoniaProbe};
use crate::registry::StreamRegistry;
use crate::timeline::StreamEntry;
use spx_common::config::TomlConfig;
use spx_common::time::{format_millis, Clock, SystemClock};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, trace, warn};

/// Audio engine extended with playback-state queries
pub struct SoundPoolEx<E> {
    engine: E,
    probe: Box<dyn DurationProbe>,
    clock: Arc<dyn Clock>,
    catalog: RwLock<SoundCatalog>,
    streams: StreamRegistry,
    /// Streams paused by `auto_pause`, resumed by `auto_resume`
    auto_paused: Mutex<HashSet<StreamId>>,
    trace_lifecycle: bool,
}

impl<E: AudioEngine> SoundPoolEx<E> {
    /// Create a pool with the symphonia probe and the system clock
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            probe: Box::new(SymphoniaProbe::new()),
            clock: Arc::new(SystemClock),
            catalog: RwLock::new(SoundCatalog::new()),
            streams: StreamRegistry::new(),
            auto_paused: Mutex::new(HashSet::new()),
            trace_lifecycle: false,
        }
    }

    /// Start building a pool
    pub fn builder() -> SoundPoolExBuilder<E> {
        SoundPoolExBuilder::new()
    }

    /// The wrapped engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load a sound and record its duration
    ///
    /// Returns `None` if the engine rejected the source. A failed duration
    /// probe does not fail the load; the sound is recorded with 0 ms.
    pub fn load(&self, source: SoundSource, priority: Priority) -> Option<SoundId> {
        let duration_ms = match self.probe.probe_duration(&source) {
            Ok(ms) => ms,
            Err(e) => {
                warn!("Duration unavailable for {}: {}", source, e);
                0
            }
        };

        let sound = self.engine.load(&source, priority)?;
        self.catalog_mut().insert(sound, duration_ms);

        debug!(
            sound = %sound,
            duration = %format_millis(duration_ms as i64),
            "Sound loaded from {}",
            source
        );
        Some(sound)
    }

    /// Load a sound from a file
    pub fn load_path(&self, path: impl Into<PathBuf>, priority: Priority) -> Option<SoundId> {
        self.load(SoundSource::Path(path.into()), priority)
    }

    /// Load a sound from an application resource
    pub fn load_resource(&self, resource_id: u32, priority: Priority) -> Option<SoundId> {
        self.load(SoundSource::Resource(resource_id), priority)
    }

    /// Load a sound from a byte range of a file
    pub fn load_range(
        &self,
        path: impl AsRef<Path>,
        offset: u64,
        length: u64,
        priority: Priority,
    ) -> Option<SoundId> {
        self.load(
            SoundSource::Range {
                path: path.as_ref().to_path_buf(),
                offset,
                length,
            },
            priority,
        )
    }

    /// Unload a sound, forgetting every stream that played it
    pub fn unload(&self, sound: SoundId) -> bool {
        let result = self.engine.unload(sound);
        self.catalog_mut().remove(sound);
        let removed = self.streams.remove_sound(sound);
        {
            let mut auto_paused = self.auto_paused_set();
            for stream in &removed {
                auto_paused.remove(stream);
            }
        }

        debug!("{} unloaded (engine: {}, streams dropped: {})", sound, result, removed.len());
        result
    }

    // ------------------------------------------------------------------
    // Stream commands
    // ------------------------------------------------------------------

    /// Play a sound; `None` if the engine could not start a stream
    pub fn play(
        &self,
        sound: SoundId,
        volume: StereoVolume,
        priority: Priority,
        loop_count: i32,
        rate: f32,
    ) -> Option<StreamId> {
        let stream = self.engine.play(sound, volume, priority, loop_count, rate)?;

        let base_duration_ms = self.catalog().duration(sound);
        let mut entry = StreamEntry::new(stream, sound, base_duration_ms);
        entry.play(self.clock.now_ms(), loop_count, rate);

        if self.trace_lifecycle {
            trace!(
                stream = %stream,
                loop_count = entry.loop_count(),
                rate = entry.rate(),
                end_time = ?entry.end_time(),
                "Stream started"
            );
        }
        if let Some(previous) = self.streams.insert(entry) {
            debug!("{} reused while tracked (was {})", stream, previous.sound());
        }

        debug!("{} is played. Stream: {}", sound, stream);
        Some(stream)
    }

    pub fn pause(&self, stream: StreamId) {
        self.engine.pause(stream);
        debug!("{} paused", stream);
        self.auto_paused_set().remove(&stream);

        if let Some(true) = self.with_stream(stream, "pause", |entry, now| entry.pause(now)) {
            self.trace_transition(stream, "paused");
        }
    }

    pub fn resume(&self, stream: StreamId) {
        self.engine.resume(stream);
        debug!("{} resumed", stream);
        self.auto_paused_set().remove(&stream);

        if let Some(true) = self.with_stream(stream, "resume", |entry, now| entry.resume(now)) {
            self.trace_transition(stream, "resumed");
        }
    }

    /// Pause every active stream
    pub fn auto_pause(&self) {
        self.engine.auto_pause();
        debug!("All streams paused (auto pause)");

        let now = self.clock.now_ms();
        let mut paused = Vec::new();
        self.streams.for_each_mut(|entry| {
            if entry.pause(now) {
                paused.push(entry.stream());
            }
        });

        self.auto_paused_set().extend(paused);
    }

    /// Resume the streams paused by [`auto_pause`](Self::auto_pause)
    pub fn auto_resume(&self) {
        self.engine.auto_resume();
        debug!("All streams resumed (auto resume)");

        let now = self.clock.now_ms();
        let paused: Vec<StreamId> = self.auto_paused_set().drain().collect();
        for stream in paused {
            self.streams.with_entry(stream, |entry| entry.resume(now));
        }
    }

    /// Stop a stream and retire its handle
    pub fn stop(&self, stream: StreamId) {
        self.engine.stop(stream);
        debug!("{} stopped", stream);

        if self.with_stream(stream, "stop", |entry, _| entry.stop()).is_some() {
            self.streams.remove(stream);
            self.auto_paused_set().remove(&stream);
            if self.trace_lifecycle {
                trace!(stream = %stream, "Stream stopped and retired");
            }
        }
    }

    pub fn set_volume(&self, stream: StreamId, volume: StereoVolume) {
        self.engine.set_volume(stream, volume);
    }

    /// Same volume on both channels
    pub fn set_volume_mono(&self, stream: StreamId, volume: f32) {
        self.set_volume(stream, StereoVolume::mono(volume));
    }

    pub fn set_priority(&self, stream: StreamId, priority: Priority) {
        self.engine.set_priority(stream, priority);
    }

    /// Change the loop count of a running stream
    pub fn set_loop(&self, stream: StreamId, loop_count: i32) {
        self.engine.set_loop(stream, loop_count);
        debug!("{} set {} loops", stream, loop_count);

        if self
            .with_stream(stream, "set_loop", |entry, now| entry.set_loop(now, loop_count))
            .is_some()
        {
            self.trace_transition(stream, "loop changed");
        }
    }

    /// Change the playback rate of a running stream
    pub fn set_rate(&self, stream: StreamId, rate: f32) {
        self.engine.set_rate(stream, rate);
        debug!("{} set rate: {}", stream, rate);

        if self
            .with_stream(stream, "set_rate", |entry, now| entry.set_rate(now, rate))
            .is_some()
        {
            self.trace_transition(stream, "rate changed");
        }
    }

    /// Release the engine and forget all sounds and streams
    pub fn release(&self) {
        self.engine.release();
        self.catalog_mut().clear();
        self.streams.clear();
        self.auto_paused_set().clear();
        debug!("Sound pool released");
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Nominal duration of a loaded sound in ms (0 if unknown)
    pub fn get_duration(&self, sound: SoundId) -> u32 {
        self.catalog().duration(sound)
    }

    /// Projected total duration of a stream under its current rate and loop
    ///
    /// 0 for unknown streams and endless loops.
    pub fn get_stream_duration(&self, stream: StreamId) -> u64 {
        self.with_stream(stream, "get_stream_duration", |entry, _| entry.duration())
            .map_or(0, |ms| ms.max(0) as u64)
    }

    /// Play time left before the stream's projected end
    pub fn stream_remaining(&self, stream: StreamId) -> Option<u64> {
        self.with_stream(stream, "stream_remaining", |entry, now| entry.remaining_ms(now))
            .flatten()
            .map(|ms| ms as u64)
    }

    /// Whether a stream is currently playing
    ///
    /// May report a stream as playing after the engine dropped it to make
    /// room for a higher-priority stream.
    pub fn is_playing(&self, stream: StreamId) -> bool {
        self.with_stream(stream, "is_playing", |entry, now| entry.is_playing(now))
            .unwrap_or(false)
    }

    /// Whether any stream of a loaded sound is currently playing
    pub fn is_sound_playing(&self, sound: SoundId) -> bool {
        if !self.catalog().contains(sound) {
            return false;
        }
        let now = self.clock.now_ms();
        self.streams.any_for_sound(sound, |entry| entry.is_playing(now))
    }

    /// Number of stream handles currently tracked
    pub fn tracked_stream_count(&self) -> usize {
        self.streams.len()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Reconcile the entry for `stream` and run `f` on it
    fn with_stream<R>(
        &self,
        stream: StreamId,
        op: &str,
        f: impl FnOnce(&mut StreamEntry, i64) -> R,
    ) -> Option<R> {
        let now = self.clock.now_ms();
        let result = self.streams.with_entry(stream, |entry| {
            if entry.reconcile(now) && self.trace_lifecycle {
                trace!(stream = %stream, now, "Stream reached projected end");
            }
            f(entry, now)
        });

        if result.is_none() {
            debug!("No tracked entry for {} ({})", stream, op);
        }
        result
    }

    fn trace_transition(&self, stream: StreamId, what: &str) {
        if !self.trace_lifecycle {
            return;
        }
        let now = self.clock.now_ms();
        self.streams.with_entry(stream, |entry| {
            trace!(
                stream = %stream,
                loop_count = entry.loop_count(),
                rate = entry.rate(),
                end_time = ?entry.end_time(),
                played_ms = ?entry.played_ms(now),
                "Stream {}",
                what
            );
        });
    }

    fn catalog(&self) -> std::sync::RwLockReadGuard<'_, SoundCatalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn catalog_mut(&self) -> std::sync::RwLockWriteGuard<'_, SoundCatalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn auto_paused_set(&self) -> std::sync::MutexGuard<'_, HashSet<StreamId>> {
        self.auto_paused.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for [`SoundPoolEx`]
pub struct SoundPoolExBuilder<E> {
    engine: Option<E>,
    probe: Option<Box<dyn DurationProbe>>,
    clock: Option<Arc<dyn Clock>>,
    config: TomlConfig,
}

impl<E: AudioEngine> SoundPoolExBuilder<E> {
    pub fn new() -> Self {
        Self {
            engine: None,
            probe: None,
            clock: None,
            config: TomlConfig::default(),
        }
    }

    /// Engine to wrap (required)
    pub fn engine(mut self, engine: E) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Duration probe; defaults to symphonia configured from `[probe]`
    pub fn probe(mut self, probe: impl DurationProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Time source; defaults to the system clock
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Apply a loaded configuration
    pub fn config(mut self, config: TomlConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration following the standard resolution order
    pub fn config_from(self, explicit: Option<&Path>) -> Result<Self> {
        let config = TomlConfig::load(explicit)?;
        Ok(self.config(config))
    }

    pub fn build(self) -> Result<SoundPoolEx<E>> {
        let engine = self
            .engine
            .ok_or_else(|| Error::Builder("engine not set".to_string()))?;

        let probe: Box<dyn DurationProbe> = match self.probe {
            Some(probe) => probe,
            None => Box::new(SymphoniaProbe::from_config(&self.config.probe)),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        Ok(SoundPoolEx {
            engine,
            probe,
            clock,
            catalog: RwLock::new(SoundCatalog::new()),
            streams: StreamRegistry::new(),
            auto_paused: Mutex::new(HashSet::new()),
            trace_lifecycle: self.config.tracker.trace_lifecycle,
        })
    }
}

impl<E: AudioEngine> Default for SoundPoolExBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
