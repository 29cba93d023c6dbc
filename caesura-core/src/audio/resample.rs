//! Sample-rate conversion using a rubato `FastFixedIn` resampler.
//!
//! ## Design
//!
//! Input files arrive at whatever rate they were recorded at; the bundled
//! speech detectors only operate at 8/16/32 kHz. `RateConverter` bridges
//! that gap. When input rate == output rate it is a zero-copy passthrough —
//! no rubato session is created at all.
//!
//! ## Usage
//!
//! ```ignore
//! let mut rc = RateConverter::new(48_000, 16_000, 1024)?;
//! let out = rc.process(&raw_samples)?; // Vec<f32> at 16 kHz
//! ```

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::info;

use crate::error::{CaesuraError, Result};

/// Input frames fed to rubato per process call.
const CHUNK_SIZE: usize = 1024;

/// Converts f32 mono audio from one fixed sample rate to another.
pub struct RateConverter {
    /// `None` when input rate == output rate (passthrough mode).
    resampler: Option<FastFixedIn<f32>>,
    /// Accumulation buffer — holds partial input chunks between calls.
    input_buf: Vec<f32>,
    /// How many input samples rubato expects per process call.
    chunk_size: usize,
    /// Pre-allocated output buffer: `[1][output_frames_max]`.
    output_buf: Vec<Vec<f32>>,
}

impl RateConverter {
    /// Create a new converter.
    ///
    /// # Parameters
    /// - `input_rate`: Sample rate of the incoming audio (Hz).
    /// - `output_rate`: Sample rate to produce (Hz).
    /// - `chunk_size`: Input frame count per rubato call (e.g. `1024`).
    ///
    /// # Errors
    /// Returns `CaesuraError::Resample` if rubato fails to initialise.
    pub fn new(input_rate: u32, output_rate: u32, chunk_size: usize) -> Result<Self> {
        if input_rate == output_rate {
            return Ok(Self {
                resampler: None,
                input_buf: Vec::new(),
                chunk_size,
                output_buf: Vec::new(),
            });
        }

        let ratio = output_rate as f64 / input_rate as f64;

        let resampler = FastFixedIn::<f32>::new(
            ratio,
            1.0, // fixed ratio — no dynamic adjustment
            PolynomialDegree::Cubic,
            chunk_size,
            1, // mono
        )
        .map_err(|e| CaesuraError::Resample(format!("resampler init: {e}")))?;

        let max_out = resampler.output_frames_max();
        let output_buf = vec![vec![0f32; max_out]; 1];

        info!(input_rate, output_rate, chunk_size, max_out, "resampling enabled");

        Ok(Self {
            resampler: Some(resampler),
            input_buf: Vec::new(),
            chunk_size,
            output_buf,
        })
    }

    /// Process incoming samples, returning resampled output (may be empty).
    ///
    /// Samples are accumulated internally until a full `chunk_size` block is
    /// available for rubato. Any remainder is kept for the next call.
    ///
    /// In passthrough mode (same rates), input is returned directly.
    pub fn process(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        let Some(ref mut resampler) = self.resampler else {
            // Zero-copy passthrough
            return Ok(samples.to_vec());
        };

        self.input_buf.extend_from_slice(samples);

        let mut result = Vec::new();

        while self.input_buf.len() >= self.chunk_size {
            let input_slice = &self.input_buf[..self.chunk_size];

            let (_consumed, produced) = resampler
                .process_into_buffer(&[input_slice], &mut self.output_buf, None)
                .map_err(|e| CaesuraError::Resample(e.to_string()))?;
            result.extend_from_slice(&self.output_buf[0][..produced]);

            self.input_buf.drain(..self.chunk_size);
        }

        Ok(result)
    }

    /// Returns `true` when input rate == output rate (no resampling occurs).
    pub fn is_passthrough(&self) -> bool {
        self.resampler.is_none()
    }
}

/// One-shot i16 resample, as used by WAV reading.
///
/// Drives a [`RateConverter`] over the whole buffer, zero-padding the tail
/// so rubato flushes its final partial chunk, then trims the output to the
/// expected `len * output_rate / input_rate` sample count.
pub fn resample_i16(samples: &[i16], input_rate: u32, output_rate: u32) -> Result<Vec<i16>> {
    if input_rate == output_rate {
        return Ok(samples.to_vec());
    }

    let mut converter = RateConverter::new(input_rate, output_rate, CHUNK_SIZE)?;
    let as_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let expected =
        (samples.len() as f64 * output_rate as f64 / input_rate as f64).round() as usize;

    let mut out = converter.process(&as_f32)?;
    out.extend(converter.process(&vec![0f32; CHUNK_SIZE])?);
    out.truncate(expected);

    Ok(out
        .iter()
        .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_identity() {
        let mut rc = RateConverter::new(16_000, 16_000, 1024).unwrap();
        assert!(rc.is_passthrough());
        let samples: Vec<f32> = (0..480).map(|i| i as f32 * 0.001).collect();
        let out = rc.process(&samples).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn ratio_48k_to_16k_correct_length() {
        let mut rc = RateConverter::new(48_000, 16_000, 1024).unwrap();
        assert!(!rc.is_passthrough());
        // 1024 input samples at 48 kHz → ~341 at 16 kHz
        let samples = vec![0.0f32; 1024];
        let out = rc.process(&samples).unwrap();
        assert!(!out.is_empty(), "expected non-empty output");
        let expected = 341usize;
        assert!(
            (out.len() as isize - expected as isize).unsigned_abs() <= 10,
            "output len={} expected≈{}",
            out.len(),
            expected
        );
    }

    #[test]
    fn partial_accumulation_returns_empty() {
        let mut rc = RateConverter::new(48_000, 16_000, 1024).unwrap();
        // Fewer than chunk_size samples → nothing output yet
        let out = rc.process(&vec![0.0f32; 500]).unwrap();
        assert!(
            out.is_empty(),
            "expected empty output for partial chunk, got {}",
            out.len()
        );
    }

    #[test]
    fn multiple_partial_chunks_accumulate() {
        let mut rc = RateConverter::new(48_000, 16_000, 1024).unwrap();
        // Two 600-sample pushes = 1200 total ≥ 1024 chunk_size → output
        let out1 = rc.process(&vec![0.0f32; 600]).unwrap();
        assert!(out1.is_empty());
        let out2 = rc.process(&vec![0.0f32; 600]).unwrap();
        assert!(!out2.is_empty(), "second push should trigger processing");
    }

    #[test]
    fn one_shot_length_matches_ratio() {
        let samples = vec![0i16; 48_000]; // 1 s at 48 kHz
        let out = resample_i16(&samples, 48_000, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn one_shot_same_rate_is_identity() {
        let samples: Vec<i16> = (0..1000).map(|i| (i % 128) as i16).collect();
        let out = resample_i16(&samples, 16_000, 16_000).unwrap();
        assert_eq!(out, samples);
    }
}
