//! Audio engine seam
//!
//! The mixing engine is opaque: it loads sounds, plays them on pooled
//! channels and accepts coarse control commands, but exposes no position or
//! completion queries. Every method is a synchronous, non-blocking call.

use crate::handle::{Priority, SoundId, StereoVolume, StreamId};
use std::path::PathBuf;

/// Where a sound's data comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SoundSource {
    /// Standalone audio file
    Path(PathBuf),

    /// Application resource identified by number
    Resource(u32),

    /// Byte range inside a larger file (e.g. a packed asset archive)
    Range {
        path: PathBuf,
        offset: u64,
        length: u64,
    },
}

impl std::fmt::Display for SoundSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoundSource::Path(path) => write!(f, "path {}", path.display()),
            SoundSource::Resource(id) => write!(f, "resource {}", id),
            SoundSource::Range {
                path,
                offset,
                length,
            } => write!(f, "range {}@{}+{}", path.display(), offset, length),
        }
    }
}

/// Primitives consumed from the audio engine
///
/// `loop_count` follows engine convention: -1 repeats forever, 0 plays once,
/// N > 0 plays N additional times. `rate` is a speed multiplier.
pub trait AudioEngine: Send + Sync {
    /// Load a sound; `None` if the engine rejected it
    fn load(&self, source: &SoundSource, priority: Priority) -> Option<SoundId>;

    /// Unload a sound, stopping its streams
    fn unload(&self, sound: SoundId) -> bool;

    /// Start a stream; `None` if no channel could be allocated
    fn play(
        &self,
        sound: SoundId,
        volume: StereoVolume,
        priority: Priority,
        loop_count: i32,
        rate: f32,
    ) -> Option<StreamId>;

    fn pause(&self, stream: StreamId);

    fn resume(&self, stream: StreamId);

    /// Pause every active stream
    fn auto_pause(&self);

    /// Resume every stream paused by `auto_pause`
    fn auto_resume(&self);

    fn stop(&self, stream: StreamId);

    fn set_volume(&self, stream: StreamId, volume: StereoVolume);

    fn set_priority(&self, stream: StreamId, priority: Priority);

    fn set_loop(&self, stream: StreamId, loop_count: i32);

    fn set_rate(&self, stream: StreamId, rate: f32);

    /// Release all engine resources
    fn release(&self);
}
