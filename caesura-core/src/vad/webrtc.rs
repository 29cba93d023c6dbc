//! WebRTC voice activity detector adapter.
//!
//! Wraps the GMM-based detector from the `webrtc-vad` crate behind the
//! [`SpeechClassifier`] trait. The detector accepts 8/16/32 kHz input and
//! frames of exactly 10, 20 or 30 ms.

use serde::{Deserialize, Serialize};
use webrtc_vad::{SampleRate, Vad, VadMode};

use super::SpeechClassifier;
use crate::error::{CaesuraError, Result};

/// Detector aggressiveness, mapped onto `webrtc_vad::VadMode`.
///
/// Higher modes are stricter about what counts as speech: fewer false
/// positives, more missed detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Aggressiveness {
    /// Least aggressive; best for clean audio environments.
    Quality = 0,
    /// Low bitrate optimised.
    LowBitrate = 1,
    /// More aggressive; good for moderate background noise.
    #[default]
    Aggressive = 2,
    /// Most aggressive; best for noisy environments.
    VeryAggressive = 3,
}

impl Aggressiveness {
    /// Parse a `0..=3` mode index (the detector's conventional CLI encoding).
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Aggressiveness::Quality),
            1 => Some(Aggressiveness::LowBitrate),
            2 => Some(Aggressiveness::Aggressive),
            3 => Some(Aggressiveness::VeryAggressive),
            _ => None,
        }
    }
}

impl From<Aggressiveness> for VadMode {
    fn from(mode: Aggressiveness) -> Self {
        match mode {
            Aggressiveness::Quality => VadMode::Quality,
            Aggressiveness::LowBitrate => VadMode::LowBitrate,
            Aggressiveness::Aggressive => VadMode::Aggressive,
            Aggressiveness::VeryAggressive => VadMode::VeryAggressive,
        }
    }
}

/// [`SpeechClassifier`] backed by the WebRTC detector.
///
/// The underlying `Vad` is `!Send`; keep each instance on the thread (and
/// the collection run) that created it.
pub struct WebRtcClassifier {
    vad: Vad,
    sample_rate: u32,
    aggressiveness: Aggressiveness,
}

impl WebRtcClassifier {
    /// Create a detector for `sample_rate` Hz.
    ///
    /// # Errors
    /// `CaesuraError::InvalidConfig` if the rate is not 8, 16 or 32 kHz.
    pub fn new(sample_rate: u32, aggressiveness: Aggressiveness) -> Result<Self> {
        let rate = detector_rate(sample_rate)?;
        Ok(Self {
            vad: Vad::new_with_rate_and_mode(rate, aggressiveness.into()),
            sample_rate,
            aggressiveness,
        })
    }

    /// The sample rate this detector was built for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn detector_rate(sample_rate: u32) -> Result<SampleRate> {
    match sample_rate {
        8_000 => Ok(SampleRate::Rate8kHz),
        16_000 => Ok(SampleRate::Rate16kHz),
        32_000 => Ok(SampleRate::Rate32kHz),
        other => Err(CaesuraError::InvalidConfig(format!(
            "webrtc detector supports 8/16/32 kHz, got {other} Hz"
        ))),
    }
}

impl SpeechClassifier for WebRtcClassifier {
    fn is_speech(&mut self, frame: &[u8], sample_rate: u32) -> Result<bool> {
        if sample_rate != self.sample_rate {
            return Err(CaesuraError::Classifier(format!(
                "detector configured for {} Hz, frame arrived at {} Hz",
                self.sample_rate, sample_rate
            )));
        }

        let samples: Vec<i16> = frame
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        self.vad.is_voice_segment(&samples).map_err(|()| {
            CaesuraError::Classifier(format!(
                "webrtc detector rejected a {}-sample frame at {} Hz",
                samples.len(),
                self.sample_rate
            ))
        })
    }

    fn reset(&mut self) {
        // Vad::reset also clears rate and mode, so rebuild instead.
        if let Ok(rate) = detector_rate(self.sample_rate) {
            self.vad = Vad::new_with_rate_and_mode(rate, self.aggressiveness.into());
        }
    }
}
