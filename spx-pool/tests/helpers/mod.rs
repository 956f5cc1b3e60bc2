//! Test helper modules for spx-pool integration tests
//!
//! Provides reusable test infrastructure components:
//! - RecordingEngine: in-memory engine that allocates handles and records commands
//! - FixedProbe: probe answering from a path → duration table
//! - audio_generator: WAV fixture generation

#![allow(dead_code)]

pub mod audio_generator;

use spx_common::ManualClock;
use spx_pool::error::{Error, Result};
use spx_pool::{AudioEngine, DurationProbe, Priority, SoundId, SoundPoolEx, SoundSource, StereoVolume, StreamId};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

/// Command received by the recording engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load(SoundSource),
    Unload(SoundId),
    Play { sound: SoundId, loop_count: i32, rate: f32 },
    Pause(StreamId),
    Resume(StreamId),
    AutoPause,
    AutoResume,
    Stop(StreamId),
    SetVolume(StreamId, StereoVolume),
    SetPriority(StreamId, Priority),
    SetLoop(StreamId, i32),
    SetRate(StreamId, f32),
    Release,
}

#[derive(Debug, Default)]
struct EngineState {
    next_sound: u32,
    next_stream: u32,
    loaded: HashSet<SoundId>,
    active: HashMap<StreamId, SoundId>,
    commands: Vec<EngineCommand>,
}

/// In-memory stand-in for the mixing engine
#[derive(Debug)]
pub struct RecordingEngine {
    max_streams: usize,
    reject_loads: bool,
    state: Mutex<EngineState>,
}

impl RecordingEngine {
    pub fn new(max_streams: usize) -> Self {
        Self {
            max_streams,
            reject_loads: false,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Engine whose `load` always fails
    pub fn rejecting_loads() -> Self {
        Self {
            reject_loads: true,
            ..Self::new(8)
        }
    }

    pub fn commands(&self) -> Vec<EngineCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    fn record(&self, command: EngineCommand) {
        self.state.lock().unwrap().commands.push(command);
    }
}

impl AudioEngine for RecordingEngine {
    fn load(&self, source: &SoundSource, _priority: Priority) -> Option<SoundId> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(EngineCommand::Load(source.clone()));
        if self.reject_loads {
            return None;
        }
        state.next_sound += 1;
        let sound = SoundId(state.next_sound);
        state.loaded.insert(sound);
        Some(sound)
    }

    fn unload(&self, sound: SoundId) -> bool {
        let mut state = self.state.lock().unwrap();
        state.commands.push(EngineCommand::Unload(sound));
        state.active.retain(|_, s| *s != sound);
        state.loaded.remove(&sound)
    }

    fn play(
        &self,
        sound: SoundId,
        _volume: StereoVolume,
        _priority: Priority,
        loop_count: i32,
        rate: f32,
    ) -> Option<StreamId> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(EngineCommand::Play {
            sound,
            loop_count,
            rate,
        });
        if !state.loaded.contains(&sound) || state.active.len() >= self.max_streams {
            return None;
        }
        state.next_stream += 1;
        let stream = StreamId(state.next_stream);
        state.active.insert(stream, sound);
        Some(stream)
    }

    fn pause(&self, stream: StreamId) {
        self.record(EngineCommand::Pause(stream));
    }

    fn resume(&self, stream: StreamId) {
        self.record(EngineCommand::Resume(stream));
    }

    fn auto_pause(&self) {
        self.record(EngineCommand::AutoPause);
    }

    fn auto_resume(&self) {
        self.record(EngineCommand::AutoResume);
    }

    fn stop(&self, stream: StreamId) {
        let mut state = self.state.lock().unwrap();
        state.commands.push(EngineCommand::Stop(stream));
        state.active.remove(&stream);
    }

    fn set_volume(&self, stream: StreamId, volume: StereoVolume) {
        self.record(EngineCommand::SetVolume(stream, volume));
    }

    fn set_priority(&self, stream: StreamId, priority: Priority) {
        self.record(EngineCommand::SetPriority(stream, priority));
    }

    fn set_loop(&self, stream: StreamId, loop_count: i32) {
        self.record(EngineCommand::SetLoop(stream, loop_count));
    }

    fn set_rate(&self, stream: StreamId, rate: f32) {
        self.record(EngineCommand::SetRate(stream, rate));
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.commands.push(EngineCommand::Release);
        state.loaded.clear();
        state.active.clear();
    }
}

/// Probe answering from a fixed path → duration table
#[derive(Debug, Default)]
pub struct FixedProbe {
    durations: HashMap<PathBuf, u32>,
}

impl FixedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, duration_ms: u32) -> Self {
        self.durations.insert(PathBuf::from(path), duration_ms);
        self
    }
}

impl DurationProbe for FixedProbe {
    fn probe_duration(&self, source: &SoundSource) -> Result<u32> {
        match source {
            SoundSource::Path(path) => self
                .durations
                .get(path)
                .copied()
                .ok_or_else(|| Error::Probe(format!("no fixture for {}", path.display()))),
            other => Err(Error::UnsupportedSource(other.to_string())),
        }
    }
}

/// Pool over a recording engine, fixed probe and manual clock starting at 0
pub fn test_pool(probe: FixedProbe) -> (SoundPoolEx<RecordingEngine>, ManualClock) {
    let clock = ManualClock::new(0);
    let pool = SoundPoolEx::builder()
        .engine(RecordingEngine::new(8))
        .probe(probe)
        .clock(clock.clone())
        .build()
        .unwrap();
    (pool, clock)
}
