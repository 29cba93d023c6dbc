//! Caesura command-line entry point.
//!
//! Reads a WAV file, splits it into voiced segments, and writes one mono WAV
//! per segment (plus an optional JSON manifest) into the output directory.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use caesura_core::{
    read_wav, write_wav, Aggressiveness, Framer, PcmBuffer, SegmenterConfig, VoicedSegments,
    WebRtcClassifier,
};
use serde::Serialize;
use tracing::info;

const USAGE: &str = "\
usage: caesura [OPTIONS] <INPUT.wav>

options:
  -o, --out-dir DIR        directory for chunk-NN.wav files (default: .)
      --frame-ms MS        frame duration: 10, 20 or 30 (default: 30)
      --padding-ms MS      window padding, a multiple of the frame (default: 300)
      --rate HZ            target rate when the input needs resampling (default: 16000)
      --aggressiveness N   detector mode 0..=3 (default: 2)
      --manifest FILE      write a JSON summary of the emitted segments
  -h, --help               print this help";

#[derive(Debug)]
struct Args {
    input: PathBuf,
    out_dir: PathBuf,
    frame_ms: u32,
    padding_ms: u32,
    target_rate: u32,
    aggressiveness: Aggressiveness,
    manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentEntry {
    file: String,
    duration_secs: f64,
    bytes: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    input: String,
    sample_rate: u32,
    frame_duration_ms: u32,
    padding_duration_ms: u32,
    aggressiveness: Aggressiveness,
    input_duration_secs: f64,
    voiced_duration_secs: f64,
    segments: Vec<SegmentEntry>,
}

fn parse_args() -> Result<Args, String> {
    let mut input: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from(".");
    let mut frame_ms: u32 = 30;
    let mut padding_ms: u32 = 300;
    let mut target_rate: u32 = 16_000;
    let mut aggressiveness = Aggressiveness::default();
    let mut manifest: Option<PathBuf> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(String::new()),
            "-o" | "--out-dir" => {
                out_dir = PathBuf::from(it.next().ok_or("missing value for --out-dir")?);
            }
            "--frame-ms" => {
                frame_ms = parse_number(&mut it, "--frame-ms")?;
            }
            "--padding-ms" => {
                padding_ms = parse_number(&mut it, "--padding-ms")?;
            }
            "--rate" => {
                target_rate = parse_number(&mut it, "--rate")?;
            }
            "--aggressiveness" => {
                let level: u8 = parse_number(&mut it, "--aggressiveness")?;
                aggressiveness = Aggressiveness::from_level(level)
                    .ok_or_else(|| format!("invalid aggressiveness: {level} (expected 0..=3)"))?;
            }
            "--manifest" => {
                manifest = Some(PathBuf::from(
                    it.next().ok_or("missing value for --manifest")?,
                ));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            other => {
                if input.replace(PathBuf::from(other)).is_some() {
                    return Err("more than one input file given".into());
                }
            }
        }
    }

    Ok(Args {
        input: input.ok_or("missing input file")?,
        out_dir,
        frame_ms,
        padding_ms,
        target_rate,
        aggressiveness,
        manifest,
    })
}

fn parse_number<T: std::str::FromStr>(
    it: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, String> {
    let value = it.next().ok_or_else(|| format!("missing value for {flag}"))?;
    value
        .parse()
        .map_err(|_| format!("invalid value for {flag}: {value}"))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let audio = read_wav(&args.input, args.target_rate)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let config = SegmenterConfig {
        sample_rate: audio.sample_rate,
        frame_duration_ms: args.frame_ms,
        padding_duration_ms: args.padding_ms,
    };
    let classifier = WebRtcClassifier::new(audio.sample_rate, args.aggressiveness)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let frames = Framer::new(&audio.bytes, config.sample_rate, config.frame_duration_ms);
    let segments = VoicedSegments::new(frames, classifier, &config)?;

    let mut entries = Vec::new();
    for (index, segment) in segments.enumerate() {
        let chunk = PcmBuffer::new(segment?, audio.sample_rate);
        let file_name = format!("chunk-{index:02}.wav");
        let path = args.out_dir.join(&file_name);

        write_wav(&path, &chunk).with_context(|| format!("writing {}", path.display()))?;
        info!(
            file = file_name.as_str(),
            duration_secs = chunk.duration_secs(),
            "segment written"
        );

        entries.push(SegmentEntry {
            file: file_name,
            duration_secs: chunk.duration_secs(),
            bytes: chunk.bytes.len(),
        });
    }

    let voiced_secs: f64 = entries.iter().map(|e| e.duration_secs).sum();
    info!(
        segments = entries.len(),
        input_secs = audio.duration_secs(),
        voiced_secs,
        "split complete"
    );

    if let Some(manifest_path) = &args.manifest {
        let manifest = Manifest {
            input: args.input.display().to_string(),
            sample_rate: audio.sample_rate,
            frame_duration_ms: config.frame_duration_ms,
            padding_duration_ms: config.padding_duration_ms,
            aggressiveness: args.aggressiveness,
            input_duration_secs: audio.duration_secs(),
            voiced_duration_secs: voiced_secs,
            segments: entries,
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(manifest_path, json)
            .with_context(|| format!("writing {}", manifest_path.display()))?;
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            if msg.is_empty() {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            eprintln!("caesura: {msg}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("caesura: {e:#}");
            ExitCode::FAILURE
        }
    }
}
