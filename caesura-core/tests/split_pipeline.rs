use caesura_core::{
    read_wav, split_voiced, write_wav, EnergyClassifier, Framer, PcmBuffer, SegmenterConfig,
    SpeechClassifier, VoicedSegments,
};

const FRAME_LEN: usize = 960; // 30 ms at 16 kHz

/// Classifier replaying a fixed vote sequence, one vote per frame.
struct ScriptedVotes {
    votes: Vec<bool>,
    next: usize,
}

impl ScriptedVotes {
    fn new(votes: Vec<bool>) -> Self {
        Self { votes, next: 0 }
    }
}

impl SpeechClassifier for ScriptedVotes {
    fn is_speech(&mut self, _frame: &[u8], _rate: u32) -> caesura_core::error::Result<bool> {
        let vote = self.votes[self.next];
        self.next += 1;
        Ok(vote)
    }
}

/// Exactly `count` frames under the default config (one spare byte keeps the
/// framer's strict cut-off from eating the last frame).
fn audio_for(count: usize) -> Vec<u8> {
    (0..count * FRAME_LEN + 1).map(|i| i as u8).collect()
}

/// 16 kHz PCM: `lead` seconds of silence, `tone` seconds of a ±amplitude
/// square wave, `tail` seconds of silence.
fn tone_in_silence(lead: f64, tone: f64, tail: f64, amplitude: i16) -> PcmBuffer {
    let rate = 16_000u32;
    let mut samples = Vec::new();
    samples.extend(vec![0i16; (lead * rate as f64) as usize]);
    let tone_samples = (tone * rate as f64) as usize;
    for i in 0..tone_samples {
        samples.push(if (i / 20) % 2 == 0 { amplitude } else { -amplitude });
    }
    samples.extend(vec![0i16; (tail * rate as f64) as usize]);
    PcmBuffer::from_samples(&samples, rate)
}

#[test]
fn scripted_scenario_five_silence_fifteen_speech_five_silence() {
    // 25 frames at 16 kHz / 30 ms / 300 ms padding (W = 10). The window
    // first becomes fully voiced at frame 14; the machine never detriggers
    // (only 5 trailing unvoiced votes), so the one segment is flushed at end
    // of input and spans frames 5..=24.
    let mut votes = vec![false; 5];
    votes.extend(vec![true; 15]);
    votes.extend(vec![false; 5]);

    let audio = audio_for(25);
    let config = SegmenterConfig::default();
    let segments = split_voiced(&audio, &config, ScriptedVotes::new(votes)).unwrap();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0], &audio[5 * FRAME_LEN..25 * FRAME_LEN]);
}

#[test]
fn replay_yields_byte_identical_segments() {
    let votes: Vec<bool> = (0..80).map(|i| (i % 13) < 9).collect();
    let audio = audio_for(votes.len());
    let config = SegmenterConfig::default();

    let first = split_voiced(&audio, &config, ScriptedVotes::new(votes.clone())).unwrap();
    let second = split_voiced(&audio, &config, ScriptedVotes::new(votes)).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn lazy_collector_yields_segments_as_they_close() {
    // Two voiced spans separated by silence: the first segment must be
    // available before the second span's frames are consumed.
    let mut votes = Vec::new();
    votes.extend(vec![true; 10]);
    votes.extend(vec![false; 15]);
    votes.extend(vec![true; 10]);

    let audio = audio_for(votes.len());
    let config = SegmenterConfig::default();
    let frames = Framer::new(&audio, config.sample_rate, config.frame_duration_ms);
    let mut segments =
        VoicedSegments::new(frames, ScriptedVotes::new(votes), &config).unwrap();

    let first = segments.next().unwrap().unwrap();
    assert_eq!(first.len(), 20 * FRAME_LEN);

    let second = segments.next().unwrap().unwrap();
    assert_eq!(second.len(), 10 * FRAME_LEN);

    assert!(segments.next().is_none());
}

#[test]
fn wav_file_to_voiced_chunks_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("speech.wav");

    // One second of "speech" (a loud square wave) embedded in silence.
    let audio = tone_in_silence(1.0, 1.0, 1.0, 16_000);
    write_wav(&input_path, &audio).unwrap();

    let loaded = read_wav(&input_path, 16_000).unwrap();
    assert_eq!(loaded, audio);

    let config = SegmenterConfig {
        sample_rate: loaded.sample_rate,
        ..SegmenterConfig::default()
    };
    // Zero hangover keeps the energy votes aligned with the tone boundaries.
    let segments =
        split_voiced(&loaded.bytes, &config, EnergyClassifier::new(0.02, 0)).unwrap();

    assert_eq!(segments.len(), 1);

    // The segment covers the tone plus at most the padding on either side.
    let chunk = PcmBuffer::new(segments[0].clone(), loaded.sample_rate);
    assert!(
        chunk.duration_secs() >= 1.0 && chunk.duration_secs() <= 1.7,
        "unexpected segment duration: {}",
        chunk.duration_secs()
    );

    // Each emitted segment is a standalone mono file at the same rate.
    let chunk_path = dir.path().join("chunk-00.wav");
    write_wav(&chunk_path, &chunk).unwrap();
    let reread = read_wav(&chunk_path, 16_000).unwrap();
    assert_eq!(reread, chunk);
}

#[test]
fn all_silence_wav_produces_no_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("silence.wav");

    write_wav(&input_path, &tone_in_silence(2.0, 0.0, 0.0, 0)).unwrap();

    let loaded = read_wav(&input_path, 16_000).unwrap();
    let config = SegmenterConfig::default();
    let segments =
        split_voiced(&loaded.bytes, &config, EnergyClassifier::new(0.02, 0)).unwrap();

    assert!(segments.is_empty());
}
