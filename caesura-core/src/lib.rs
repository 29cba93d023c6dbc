//! # caesura-core
//!
//! Reusable voiced-segment splitting SDK.
//!
//! ## Architecture
//!
//! ```text
//! WAV file → read_wav (downmix + resample) → PcmBuffer
//!                                               │
//!                                     Framer (fixed-duration frames)
//!                                               │
//!                              SpeechClassifier::is_speech per frame
//!                                               │
//!                             VoicedSegments (padded hysteresis window)
//!                                               │
//!                                voiced PCM buffers → write_wav
//! ```
//!
//! Framing and collection are zero-copy over the input buffer; emitted
//! segments own their bytes and can be persisted as standalone mono files.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod error;
pub mod framing;
pub mod segment;
pub mod vad;

// Convenience re-exports for downstream crates
pub use audio::{pcm::PcmBuffer, read_wav, write_wav};
pub use error::CaesuraError;
pub use framing::{Frame, Framer};
pub use segment::{split_voiced, SegmenterConfig, VoicedSegments};
pub use vad::{EnergyClassifier, SpeechClassifier};

#[cfg(feature = "webrtc")]
pub use vad::{Aggressiveness, WebRtcClassifier};
