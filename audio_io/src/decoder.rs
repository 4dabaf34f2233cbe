use log::{debug, warn};
use scene_core::{AudioBuffer, Error};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// Fully decoded audio file
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved samples in -1.0..=1.0
    pub samples: AudioBuffer,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// Decode every packet of the default track of `path` into f32 samples
pub fn decode_file(path: &Path) -> Result<DecodedAudio, Error> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("Failed to probe {}: {}", path.display(), e)))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| Error::Decode(format!("No audio track in {}", path.display())))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("Unsupported codec in {}: {}", path.display(), e)))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels = codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);
    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(Error::Decode(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping corrupt packet in {}: {}", path.display(), e);
            }
            Err(e) => {
                return Err(Error::Decode(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    debug!(
        "Decoded {} ({} samples, {} Hz, {} ch)",
        path.display(),
        samples.len(),
        sample_rate,
        channels
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Scale `samples` so the peak magnitude is 1.0. Returns the applied factor.
///
/// Silent buffers are left alone.
pub fn normalize_peak(samples: &mut [f32]) -> f32 {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak <= f32::EPSILON {
        return 1.0;
    }

    let scale = 1.0 / peak;
    for sample in samples.iter_mut() {
        *sample *= scale;
    }
    scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::write_pcm16_wav;
    use tempfile::tempdir;

    #[test]
    fn normalize_scales_to_full_range() {
        let mut samples = vec![0.1, -0.25, 0.2];
        let scale = normalize_peak(&mut samples);
        assert!((scale - 4.0).abs() < 1e-6);
        assert!((samples[1] + 1.0).abs() < 1e-6);
        assert!((samples[0] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_silence() {
        let mut samples = vec![0.0; 16];
        assert_eq!(normalize_peak(&mut samples), 1.0);
        assert!(samples.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn decode_pcm16_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_pcm16_wav(&path, 22_050, 1, &[0, 16_384, -16_384, 8_192]).unwrap();

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.sample_rate, 22_050);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 4);
        assert!((decoded.samples[1] - 0.5).abs() < 1e-3);
        assert!((decoded.samples[2] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn decode_stereo_counts_frames() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_pcm16_wav(&path, 48_000, 2, &[100; 9_600]).unwrap();

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.frames(), 4_800);
        assert!((decoded.duration_secs() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn decode_garbage_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not a riff file").unwrap();
        assert!(matches!(decode_file(&path), Err(Error::Decode(_))));
    }
}
