//! Owned PCM audio shuttled between file I/O and the segmentation core.

/// A buffer of mono 16-bit little-endian PCM at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Raw sample bytes, two per sample.
    pub bytes: Vec<u8>,
    /// Sample rate in Hz (e.g. 8000, 16000, 32000).
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(bytes: Vec<u8>, sample_rate: u32) -> Self {
        Self { bytes, sample_rate }
    }

    /// Build a buffer from i16 samples (little-endian byte order).
    pub fn from_samples(samples: &[i16], sample_rate: u32) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        Self { bytes, sample_rate }
    }

    /// Decode the byte buffer back into i16 samples.
    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    /// Returns the duration of this buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.bytes.len() as f64 / 2.0 / self.sample_rate as f64
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
