//! Audio Test File Generation Utilities
//!
//! Generates silent WAV files of known length for duration probe tests.

use hound::{WavSpec, WavWriter};
use std::io::Cursor;
use std::path::Path;

/// Standard test sample rate (44.1 kHz)
pub const TEST_SAMPLE_RATE: u32 = 44100;

fn spec(channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: TEST_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Generate a silent WAV file of `duration_ms`
pub fn generate_silent_wav<P: AsRef<Path>>(
    path: P,
    duration_ms: u64,
    channels: u16,
) -> Result<(), hound::Error> {
    let mut writer = WavWriter::create(path, spec(channels))?;

    let total_frames = (TEST_SAMPLE_RATE as u64 * duration_ms) / 1000;
    for _ in 0..total_frames * channels as u64 {
        writer.write_sample(0i16)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Generate a silent WAV image in memory
pub fn silent_wav_bytes(duration_ms: u64, channels: u16) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec(channels))?;
        let total_frames = (TEST_SAMPLE_RATE as u64 * duration_ms) / 1000;
        for _ in 0..total_frames * channels as u64 {
            writer.write_sample(0i16)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
