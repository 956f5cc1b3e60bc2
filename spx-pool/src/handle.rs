//! Engine handle types
//!
//! The engine signals failure with a zero handle. At this boundary that
//! becomes `Option<SoundId>` / `Option<StreamId>`, so a constructed handle
//! is always one the engine actually returned.

use std::fmt;

/// Identity of a loaded sound asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub u32);

/// Identity of one playback instance of a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub u32);

impl SoundId {
    /// Convert a raw engine handle, mapping 0 to `None`
    pub fn from_raw(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }
}

impl StreamId {
    /// Convert a raw engine handle, mapping 0 to `None`
    pub fn from_raw(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sound#{}", self.0)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// Engine stream priority (higher wins when channels run out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Priority(pub i32);

/// Per-channel stream volume (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoVolume {
    pub left: f32,
    pub right: f32,
}

impl StereoVolume {
    /// Create a stereo volume, clamping both channels to 0.0-1.0
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: left.clamp(0.0, 1.0),
            right: right.clamp(0.0, 1.0),
        }
    }

    /// Same volume on both channels
    pub fn mono(volume: f32) -> Self {
        Self::new(volume, volume)
    }
}

impl Default for StereoVolume {
    fn default() -> Self {
        Self::mono(1.0)
    }
}
