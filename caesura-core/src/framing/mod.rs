//! Fixed-duration framing of raw PCM byte buffers.
//!
//! ## Algorithm
//!
//! The frame byte length is `n = sample_rate * frame_duration_ms / 1000 * 2`
//! (integer arithmetic, two bytes per 16-bit sample). Frames are taken
//! front-to-back with no gap and no overlap; the reported duration is derived
//! back from `n` (`n / sample_rate / 2` seconds) so that integer truncation
//! shows up consistently in both the slice size and the timestamps.
//!
//! A trailing remainder shorter than one full frame is dropped. The cut-off
//! uses a strict `offset + n < len` comparison, so a final chunk that exactly
//! fills the remaining bytes is dropped as well — callers that need the tail
//! must pad the input themselves.

/// One fixed-duration slice of a PCM stream.
///
/// Borrowed from the source buffer; never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    /// Raw 16-bit little-endian mono PCM bytes.
    pub bytes: &'a [u8],
    /// Start time within the source stream, in seconds.
    pub timestamp: f64,
    /// Frame length in seconds, derived from the byte length.
    pub duration: f64,
}

/// Lazy iterator of uniform [`Frame`]s over a flat PCM byte buffer.
///
/// Single-pass and non-restartable. Performs no input validation: the caller
/// is responsible for supplying well-formed 16-bit mono PCM.
#[derive(Debug, Clone)]
pub struct Framer<'a> {
    audio: &'a [u8],
    frame_len: usize,
    duration: f64,
    offset: usize,
    timestamp: f64,
}

impl<'a> Framer<'a> {
    pub fn new(audio: &'a [u8], sample_rate: u32, frame_duration_ms: u32) -> Self {
        let frame_len = (sample_rate as usize * frame_duration_ms as usize / 1000) * 2;
        let duration = if sample_rate == 0 {
            0.0
        } else {
            frame_len as f64 / sample_rate as f64 / 2.0
        };
        Self {
            audio,
            frame_len,
            duration,
            offset: 0,
            timestamp: 0.0,
        }
    }

    /// Byte length of each emitted frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }
}

impl<'a> Iterator for Framer<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        // Degenerate configuration: a zero-length frame would never advance
        // the cursor, so the iterator is simply empty.
        if self.frame_len == 0 {
            return None;
        }
        // Strict `<`: an exactly-filling final chunk is treated as remainder.
        if self.offset + self.frame_len >= self.audio.len() {
            return None;
        }
        let frame = Frame {
            bytes: &self.audio[self.offset..self.offset + self.frame_len],
            timestamp: self.timestamp,
            duration: self.duration,
        };
        self.offset += self.frame_len;
        self.timestamp += self.duration;
        Some(frame)
    }
}
