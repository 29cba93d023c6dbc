//! Voiced-segment collection: a padded sliding-window hysteresis machine.
//!
//! ## Algorithm
//!
//! Each frame and its speech vote is pushed through a bounded window holding
//! `padding_duration_ms / frame_duration_ms` entries (oldest evicted first).
//! While not triggered, the machine watches the window fill; once more than
//! 90% of its votes are voiced, it triggers and the whole window — the onset
//! padding — opens the accumulating segment. While triggered, every frame is
//! appended; once more than 90% of the window votes unvoiced, the machine
//! detriggers and emits the segment. Leftover frames at end of input are
//! flushed as a final segment regardless of state.
//!
//! The 90% comparison is a strict float inequality (`count > 0.9 * W`): in a
//! ten-frame window, nine voiced votes do not trigger — ten do.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CaesuraError, Result};
use crate::framing::{Frame, Framer};
use crate::vad::SpeechClassifier;

/// Fraction of the vote window that must agree before a transition.
const TRANSITION_RATIO: f64 = 0.9;

/// Configuration for the framer + collector pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SegmenterConfig {
    /// Sample rate of the PCM input, in Hz. Default: 16000.
    pub sample_rate: u32,
    /// Frame duration in milliseconds. Default: 30.
    pub frame_duration_ms: u32,
    /// Window padding in milliseconds; sets the vote-window capacity to
    /// `padding_duration_ms / frame_duration_ms` frames. Default: 300.
    pub padding_duration_ms: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_duration_ms: 30,
            padding_duration_ms: 300,
        }
    }
}

impl SegmenterConfig {
    /// Vote-window capacity in frames. Only meaningful once [`validate`]
    /// has passed.
    ///
    /// [`validate`]: SegmenterConfig::validate
    pub fn num_padding_frames(&self) -> usize {
        (self.padding_duration_ms / self.frame_duration_ms) as usize
    }

    /// Fail fast on configurations the state machine cannot run with.
    ///
    /// # Errors
    /// `CaesuraError::InvalidConfig` on a zero sample rate or frame
    /// duration, padding shorter than one frame (the vote window would be
    /// empty), or padding that does not divide evenly into frames.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(CaesuraError::InvalidConfig(
                "sample_rate must be non-zero".into(),
            ));
        }
        if self.frame_duration_ms == 0 {
            return Err(CaesuraError::InvalidConfig(
                "frame_duration_ms must be non-zero".into(),
            ));
        }
        if self.padding_duration_ms < self.frame_duration_ms {
            return Err(CaesuraError::InvalidConfig(format!(
                "padding_duration_ms ({}) is shorter than one frame ({} ms)",
                self.padding_duration_ms, self.frame_duration_ms
            )));
        }
        if self.padding_duration_ms % self.frame_duration_ms != 0 {
            return Err(CaesuraError::InvalidConfig(format!(
                "padding_duration_ms ({}) must be a whole multiple of frame_duration_ms ({})",
                self.padding_duration_ms, self.frame_duration_ms
            )));
        }
        Ok(())
    }
}

/// Hysteresis machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerState {
    NotTriggered,
    Triggered,
}

/// Lazy stream of voiced-segment byte buffers.
///
/// Wraps a frame iterator and a classifier; yields one owned buffer per
/// voiced span, padding included. Single-pass and single-threaded: each
/// collection run owns its window and accumulator, so independent runs never
/// share state. A classifier error is yielded once, after which the iterator
/// is exhausted.
pub struct VoicedSegments<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    frames: I,
    classifier: C,
    sample_rate: u32,
    /// Vote-window capacity `W`.
    capacity: usize,
    window: VecDeque<(Frame<'a>, bool)>,
    /// Frames accumulated for the segment currently being built.
    voiced: Vec<Frame<'a>>,
    state: TriggerState,
    done: bool,
}

impl<'a, I, C> VoicedSegments<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    /// Build a collector over `frames`.
    ///
    /// # Errors
    /// `CaesuraError::InvalidConfig` when `config` fails validation.
    pub fn new(frames: I, classifier: C, config: &SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let capacity = config.num_padding_frames();
        Ok(Self {
            frames,
            classifier,
            sample_rate: config.sample_rate,
            capacity,
            window: VecDeque::with_capacity(capacity + 1),
            voiced: Vec::new(),
            state: TriggerState::NotTriggered,
            done: false,
        })
    }

    fn push_vote(&mut self, frame: Frame<'a>, is_speech: bool) {
        self.window.push_back((frame, is_speech));
        if self.window.len() > self.capacity {
            self.window.pop_front();
        }
    }

    /// Drain the accumulator into one contiguous byte buffer.
    fn take_segment(&mut self) -> Vec<u8> {
        let total: usize = self.voiced.iter().map(|f| f.bytes.len()).sum();
        let mut segment = Vec::with_capacity(total);
        for frame in self.voiced.drain(..) {
            segment.extend_from_slice(frame.bytes);
        }
        segment
    }
}

impl<'a, I, C> Iterator for VoicedSegments<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while let Some(frame) = self.frames.next() {
            let is_speech = match self.classifier.is_speech(frame.bytes, self.sample_rate) {
                Ok(vote) => vote,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            match self.state {
                TriggerState::NotTriggered => {
                    self.push_vote(frame, is_speech);
                    let voiced_votes = self.window.iter().filter(|(_, vote)| *vote).count();
                    if voiced_votes as f64 > TRANSITION_RATIO * self.capacity as f64 {
                        let start = self
                            .window
                            .front()
                            .map_or(frame.timestamp, |(f, _)| f.timestamp);
                        debug!(start_secs = start, "voiced segment opened");
                        self.state = TriggerState::Triggered;
                        // The window holds the onset padding; it opens the segment.
                        self.voiced.extend(self.window.drain(..).map(|(f, _)| f));
                    }
                }
                TriggerState::Triggered => {
                    self.voiced.push(frame);
                    self.push_vote(frame, is_speech);
                    let unvoiced_votes = self.window.iter().filter(|(_, vote)| !*vote).count();
                    if unvoiced_votes as f64 > TRANSITION_RATIO * self.capacity as f64 {
                        debug!(
                            end_secs = frame.timestamp + frame.duration,
                            "voiced segment closed"
                        );
                        self.state = TriggerState::NotTriggered;
                        self.window.clear();
                        return Some(Ok(self.take_segment()));
                    }
                }
            }
        }

        // Input exhausted: flush leftover frames regardless of state.
        self.done = true;
        if self.voiced.is_empty() {
            None
        } else {
            debug!("flushing open segment at end of input");
            Some(Ok(self.take_segment()))
        }
    }
}

/// Split `audio` into voiced segments in one call.
///
/// Frames the buffer, classifies each frame, and drains the lazy collector
/// into owned segment buffers. `audio` must be 16-bit little-endian mono PCM
/// at `config.sample_rate`.
///
/// # Errors
/// `CaesuraError::InvalidConfig` on a bad configuration; the first
/// classifier error otherwise (segments already emitted are discarded —
/// iterate [`VoicedSegments`] directly to keep them).
pub fn split_voiced<C>(audio: &[u8], config: &SegmenterConfig, classifier: C) -> Result<Vec<Vec<u8>>>
where
    C: SpeechClassifier,
{
    let frames = Framer::new(audio, config.sample_rate, config.frame_duration_ms);
    VoicedSegments::new(frames, classifier, config)?.collect()
}
