//! # SPX Sound Pool Extension (spx-pool)
//!
//! Derived playback-state tracking layered over an opaque audio-mixing
//! engine.
//!
//! **Purpose:** The engine plays short sounds on pooled channels but cannot
//! report whether a stream is still playing or how long it will run. This
//! crate mirrors every command sent to the engine into a per-stream
//! timeline and answers those questions from wall-clock arithmetic alone.
//!
//! **Architecture:**
//! - [`catalog`]: sound handle → nominal duration, filled at load time
//! - [`timeline`]: per-stream state machine (play/pause/resume/rate/loop)
//! - [`registry`]: stream handle → timeline entry, with unload cascade
//! - [`pool`]: [`SoundPoolEx`] facade forwarding to engine and tracker

pub mod catalog;
pub mod engine;
pub mod error;
pub mod handle;
pub mod pool;
pub mod probe;
pub mod registry;
pub mod timeline;

pub use engine::{AudioEngine, SoundSource};
pub use error::{Error, Result};
pub use handle::{Priority, SoundId, StereoVolume, StreamId};
pub use pool::{SoundPoolEx, SoundPoolExBuilder};
pub use probe::{DurationProbe, NullProbe, SymphoniaProbe};
