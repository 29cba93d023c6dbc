//! WAV file collaborators: reading (with downmix + resample) and writing.
//!
//! ## Design
//!
//! The segmentation core consumes flat 16-bit mono PCM byte buffers and
//! never touches the filesystem. This module produces and persists those
//! buffers: [`read_wav`] normalises arbitrary 16-bit WAV input (any channel
//! count, any rate) into a [`PcmBuffer`] the detectors accept, [`write_wav`]
//! stores one buffer as a standalone mono file.

pub mod pcm;
pub mod resample;

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::info;

use crate::error::{CaesuraError, Result};
use pcm::PcmBuffer;

/// Rates the bundled detectors operate on natively. Files at any other rate
/// are resampled to the caller's target rate on read.
pub const SUPPORTED_RATES: [u32; 3] = [8_000, 16_000, 32_000];

/// Read a WAV file into a mono 16-bit PCM buffer.
///
/// Multi-channel input is downmixed by per-frame arithmetic mean. When the
/// file's rate is not in [`SUPPORTED_RATES`], the audio is resampled to
/// `target_sample_rate`; otherwise the file's own rate is kept.
///
/// # Errors
/// `CaesuraError::UnsupportedFormat` unless the file holds 16-bit integer
/// PCM; `CaesuraError::Wav` on malformed files.
pub fn read_wav(path: impl AsRef<Path>, target_sample_rate: u32) -> Result<PcmBuffer> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(CaesuraError::UnsupportedFormat(format!(
            "{}: expected 16-bit integer PCM, got {}-bit {:?}",
            path.display(),
            spec.bits_per_sample,
            spec.sample_format
        )));
    }

    let interleaved: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<_, _>>()?;

    let mono = downmix(&interleaved, spec.channels);

    let (samples, sample_rate) = if SUPPORTED_RATES.contains(&spec.sample_rate) {
        (mono, spec.sample_rate)
    } else {
        let resampled = resample::resample_i16(&mono, spec.sample_rate, target_sample_rate)?;
        (resampled, target_sample_rate)
    };

    let buffer = PcmBuffer::from_samples(&samples, sample_rate);
    info!(
        path = %path.display(),
        channels = spec.channels,
        file_rate = spec.sample_rate,
        sample_rate,
        duration_secs = buffer.duration_secs(),
        "WAV loaded"
    );
    Ok(buffer)
}

/// Downmix interleaved samples to mono by averaging across channels.
///
/// A trailing incomplete sample frame (malformed interleaving) is dropped.
fn downmix(interleaved: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let ch = channels as usize;
    interleaved
        .chunks_exact(ch)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
            (sum / ch as i32) as i16
        })
        .collect()
}

/// Write a PCM buffer as a standalone mono 16-bit WAV file.
///
/// # Errors
/// `CaesuraError::Wav` if the file cannot be created or written.
pub fn write_wav(path: impl AsRef<Path>, buffer: &PcmBuffer) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
