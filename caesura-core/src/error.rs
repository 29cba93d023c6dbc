use thiserror::Error;

/// All errors produced by caesura-core.
#[derive(Debug, Error)]
pub enum CaesuraError {
    #[error("invalid segmenter configuration: {0}")]
    InvalidConfig(String),

    #[error("classifier error: {0}")]
    Classifier(String),

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("resampler error: {0}")]
    Resample(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CaesuraError>;
