//! Synthetic stand-ins for the nature recordings.
//!
//! Used to fill an asset directory when the real recordings are absent,
//! and by tests that need a decodable file on disk.

use hound::{SampleFormat, WavSpec, WavWriter};
use scene_core::Error;
use std::path::Path;

/// Generate a mono sine tone as 16-bit PCM
pub fn generate_tone(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<i16> {
    let len = (duration_secs * sample_rate as f32) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let value = (t * frequency * 2.0 * std::f32::consts::PI).sin() * 0.5;
            (value * i16::MAX as f32) as i16
        })
        .collect()
}

/// Write interleaved 16-bit samples as a PCM WAV file
pub fn write_pcm16_wav(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    samples: &[i16],
) -> Result<(), Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| wav_error(path, e))?;
    for sample in samples {
        writer.write_sample(*sample).map_err(|e| wav_error(path, e))?;
    }
    writer.finalize().map_err(|e| wav_error(path, e))
}

fn wav_error(path: &Path, err: hound::Error) -> Error {
    match err {
        hound::Error::IoError(e) => Error::Io(e),
        other => Error::Audio(format!("Failed to write {}: {}", path.display(), other)),
    }
}
