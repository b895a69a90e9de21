use super::model::PipelineStage;
use crate::error::AppError;
use crate::infrastructure::engines::EngineError;
use std::time::Duration;

/// Longest engine message forwarded to clients
const MAX_CLIENT_DETAIL_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum WavEncodeError {
    #[error("sample rate must be positive")]
    ZeroSampleRate,
    #[error("channel count must be positive")]
    ZeroChannels,
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),
    #[error("{samples} samples do not divide into {channels} channels")]
    PartialFrame { samples: usize, channels: u16 },
    #[error("sample does not fit in {0} bits")]
    SampleOutOfRange(u16),
    #[error("wav writer: {0}")]
    Writer(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AudioServiceError {
    #[error("{0} must not be blank")]
    MissingField(&'static str),
    #[error("text must be {max} characters or less (got {actual})")]
    TextTooLong { max: usize, actual: usize },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("engine returned no audio")]
    EmptyAudio,
    #[error("synthesis exceeded {0:?}")]
    Timeout(Duration),
    #[error("synthesis engine is shut down")]
    EngineClosed,
    #[error("engine task aborted: {0}")]
    EngineTask(String),
    #[error(transparent)]
    Encoding(#[from] WavEncodeError),
}

impl AudioServiceError {
    /// Stage the pipeline was in when this error stopped it
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::MissingField(_) | Self::TextTooLong { .. } => PipelineStage::Validating,
            Self::Engine(_)
            | Self::EmptyAudio
            | Self::Timeout(_)
            | Self::EngineClosed
            | Self::EngineTask(_) => PipelineStage::Synthesizing,
            Self::Encoding(_) => PipelineStage::Encoding,
        }
    }
}

impl From<AudioServiceError> for AppError {
    fn from(err: AudioServiceError) -> Self {
        match err {
            AudioServiceError::MissingField(_) => AppError::BadRequest(err.to_string()),
            AudioServiceError::TextTooLong { .. } => AppError::PayloadTooLarge(err.to_string()),
            AudioServiceError::Timeout(_) => AppError::SynthesisTimeout(err.to_string()),
            AudioServiceError::Engine(_)
            | AudioServiceError::EmptyAudio
            | AudioServiceError::EngineClosed
            | AudioServiceError::EngineTask(_) => {
                AppError::SynthesisFailure(summarize(&err.to_string()))
            }
            AudioServiceError::Encoding(_) => AppError::EncodingFailure(err.to_string()),
        }
    }
}

/// First line of an engine message, capped in length
fn summarize(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default().trim();
    if first_line.chars().count() <= MAX_CLIENT_DETAIL_CHARS {
        return first_line.to_string();
    }
    let mut truncated: String = first_line.chars().take(MAX_CLIENT_DETAIL_CHARS).collect();
    truncated.push_str("...");
    truncated
}
