//! Speech/non-speech frame classification.
//!
//! `SpeechClassifier` is the primary extensibility point: the segment
//! collector calls it once per frame and has no compile-time coupling to any
//! concrete detector. Swap in `EnergyClassifier` (always available),
//! `WebRtcClassifier` (default `webrtc` feature), or any future neural VAD
//! without touching the collector.

pub mod energy;

#[cfg(feature = "webrtc")]
pub mod webrtc;

pub use energy::EnergyClassifier;

#[cfg(feature = "webrtc")]
pub use webrtc::{Aggressiveness, WebRtcClassifier};

use crate::error::Result;

/// Per-frame speech/non-speech capability.
///
/// Implementors may be stateful (hangover counters, GMM state, RNN hidden
/// states); `is_speech` therefore takes `&mut self`.
pub trait SpeechClassifier {
    /// Classify one frame of 16-bit little-endian mono PCM.
    ///
    /// `frame` holds exactly one frame's worth of bytes at `sample_rate`.
    /// An error is fatal to the collection run that issued the call.
    fn is_speech(&mut self, frame: &[u8], sample_rate: u32) -> Result<bool>;

    /// Reset any internal state (e.g. hangover counters, hidden states).
    fn reset(&mut self) {}
}

/// Closures can stand in for a detector, e.g. scripted votes in tests.
impl<F> SpeechClassifier for F
where
    F: FnMut(&[u8], u32) -> Result<bool>,
{
    fn is_speech(&mut self, frame: &[u8], sample_rate: u32) -> Result<bool> {
        self(frame, sample_rate)
    }
}
