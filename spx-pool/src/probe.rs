//! Sound duration probing
//!
//! Reads a sound's nominal single-pass duration from container metadata
//! using symphonia. Only the format reader is opened; no packets are
//! decoded.
//!
//! A probe failure is never fatal for loading. The pool records the sound
//! with a duration of 0 ms, which downstream means "duration unknown".

use crate::engine::SoundSource;
use crate::error::{Error, Result};
use spx_common::config::ProbeConfig;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Measures the duration of a sound source in milliseconds
pub trait DurationProbe: Send + Sync {
    /// Duration at rate 1.0, single pass
    fn probe_duration(&self, source: &SoundSource) -> Result<u32>;
}

/// Probe that never knows a duration
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProbe;

impl DurationProbe for NullProbe {
    fn probe_duration(&self, _source: &SoundSource) -> Result<u32> {
        Ok(0)
    }
}

/// Container-metadata probe backed by symphonia
#[derive(Debug, Clone)]
pub struct SymphoniaProbe {
    enabled: bool,
    resources: HashMap<u32, PathBuf>,
}

impl SymphoniaProbe {
    /// Create an enabled probe with no resource mappings
    pub fn new() -> Self {
        Self {
            enabled: true,
            resources: HashMap::new(),
        }
    }

    /// Create a probe from the `[probe]` configuration section
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            enabled: config.enabled,
            resources: config
                .resources
                .iter()
                .map(|m| (m.id, m.path.clone()))
                .collect(),
        }
    }

    /// Map a resource identifier to the file holding its data
    pub fn with_resource(mut self, id: u32, path: impl Into<PathBuf>) -> Self {
        self.resources.insert(id, path.into());
        self
    }

    fn probe_path(&self, path: &Path) -> Result<u32> {
        let file = File::open(path).map_err(|e| {
            Error::Probe(format!("Failed to open file {}: {}", path.display(), e))
        })?;
        probe_media(Box::new(file), extension_hint(path))
    }

    fn probe_range(&self, path: &Path, offset: u64, length: u64) -> Result<u32> {
        let mut file = File::open(path).map_err(|e| {
            Error::Probe(format!("Failed to open file {}: {}", path.display(), e))
        })?;
        file.seek(SeekFrom::Start(offset))?;

        let mut bytes = Vec::new();
        file.take(length).read_to_end(&mut bytes)?;
        if (bytes.len() as u64) < length {
            return Err(Error::Probe(format!(
                "Range {}+{} extends past end of {}",
                offset,
                length,
                path.display()
            )));
        }

        probe_media(Box::new(Cursor::new(bytes)), extension_hint(path))
    }
}

impl Default for SymphoniaProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationProbe for SymphoniaProbe {
    fn probe_duration(&self, source: &SoundSource) -> Result<u32> {
        if !self.enabled {
            return Ok(0);
        }

        let duration_ms = match source {
            SoundSource::Path(path) => self.probe_path(path)?,
            SoundSource::Resource(id) => {
                let path = self.resources.get(id).ok_or_else(|| {
                    Error::UnsupportedSource(format!("No file mapped for resource {}", id))
                })?;
                self.probe_path(path)?
            }
            SoundSource::Range {
                path,
                offset,
                length,
            } => self.probe_range(path, *offset, *length)?,
        };

        debug!("Probed {}: {} ms", source, duration_ms);
        Ok(duration_ms)
    }
}

fn extension_hint(path: &Path) -> Hint {
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    hint
}

/// Read the default audio track's length from container metadata
fn probe_media(source: Box<dyn MediaSource>, hint: Hint) -> Result<u32> {
    let mss = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Probe(format!("Failed to probe format: {}", e)))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Probe("No audio track found".to_string()))?;

    let params = &track.codec_params;
    let n_frames = params
        .n_frames
        .ok_or_else(|| Error::Probe("Frame count not available".to_string()))?;

    let millis = if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(n_frames);
        time.seconds * 1000 + (time.frac * 1000.0) as u64
    } else if let Some(sample_rate) = params.sample_rate.filter(|&sr| sr > 0) {
        n_frames * 1000 / sample_rate as u64
    } else {
        return Err(Error::Probe("Neither time base nor sample rate available".to_string()));
    };

    Ok(millis.min(u32::MAX as u64) as u32)
}
