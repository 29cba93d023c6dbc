//! Energy-based classifier using RMS threshold + hangover counter.
//!
//! ## Algorithm
//!
//! 1. Compute RMS of the frame's normalised samples.
//! 2. If RMS ≥ `threshold` → report speech, reset hangover counter.
//! 3. If RMS < `threshold` and hangover counter > 0 → report speech,
//!    decrement counter (prevents clipping syllable endings).
//! 4. Otherwise → report non-speech.

use super::SpeechClassifier;
use crate::error::Result;

/// A simple energy-based speech classifier.
#[derive(Debug, Clone)]
pub struct EnergyClassifier {
    /// RMS amplitude threshold on samples normalised to [-1.0, 1.0].
    /// Frames above this are considered speech. Typical range: 0.01–0.05.
    threshold: f32,
    /// How many consecutive below-threshold frames still report speech
    /// after real speech ends.
    hangover_frames: u32,
    /// Current hangover countdown.
    hangover_counter: u32,
}

impl EnergyClassifier {
    /// Create a new `EnergyClassifier`.
    ///
    /// # Parameters
    /// - `threshold`: RMS level above which a frame is considered speech.
    ///   Default: `0.02`.
    /// - `hangover_frames`: Number of silent frames to extend speech
    ///   detection. Default: `8` (≈ 240 ms at a 30 ms frame).
    pub fn new(threshold: f32, hangover_frames: u32) -> Self {
        Self {
            threshold,
            hangover_frames,
            hangover_counter: 0,
        }
    }

    /// Root-mean-square of a 16-bit little-endian PCM byte slice.
    fn rms(frame: &[u8]) -> f32 {
        let mut sum_sq = 0f32;
        let mut count = 0usize;
        for pair in frame.chunks_exact(2) {
            let sample = i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0;
            sum_sq += sample * sample;
            count += 1;
        }
        if count == 0 {
            return 0.0;
        }
        (sum_sq / count as f32).sqrt()
    }
}

impl Default for EnergyClassifier {
    fn default() -> Self {
        Self::new(0.02, 8)
    }
}

impl SpeechClassifier for EnergyClassifier {
    fn is_speech(&mut self, frame: &[u8], _sample_rate: u32) -> Result<bool> {
        let rms = Self::rms(frame);

        if rms >= self.threshold {
            // Active speech detected — reset hangover
            self.hangover_counter = self.hangover_frames;
            Ok(true)
        } else if self.hangover_counter > 0 {
            // Within hangover window — still report speech
            self.hangover_counter -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn reset(&mut self) {
        self.hangover_counter = 0;
    }
}
