use super::error::{AudioServiceError, WavEncodeError};
use crate::infrastructure::engines::{EngineOutput, EngineSamples};

/// Language used when the caller does not name one
pub const DEFAULT_LANGUAGE: &str = "Chinese";
/// Channel count assumed when the engine does not report one
pub const DEFAULT_CHANNEL_COUNT: u16 = 1;
/// Bit depth assumed when the engine does not report one
pub const DEFAULT_BIT_DEPTH: u16 = 16;

/// Stage of a single audio-generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Synthesizing,
    Encoding,
    Delivered,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validating => "validating",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Encoding => "encoding",
            PipelineStage::Delivered => "delivered",
            PipelineStage::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated, normalized synthesis request.
///
/// `text` and `instruct` are trimmed and non-empty; `language` is always
/// populated. The language tag is otherwise opaque and left to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynthesisRequest {
    text: String,
    language: String,
    instruct: String,
}

impl SynthesisRequest {
    /// Validate raw request parameters.
    ///
    /// `max_text_chars` bounds `text` in Unicode scalar values.
    pub fn parse(
        text: Option<&str>,
        language: Option<&str>,
        instruct: Option<&str>,
        max_text_chars: usize,
    ) -> Result<Self, AudioServiceError> {
        let text = required("text", text)?;
        let instruct = required("instruct", instruct)?;

        let text_chars = text.chars().count();
        if text_chars > max_text_chars {
            return Err(AudioServiceError::TextTooLong {
                max: max_text_chars,
                actual: text_chars,
            });
        }

        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        Ok(Self {
            text: text.to_string(),
            language: language.to_string(),
            instruct: instruct.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn instruct(&self) -> &str {
        &self.instruct
    }
}

fn required<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, AudioServiceError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AudioServiceError::MissingField(field))
}

/// Integer PCM audio ready for container encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioResult {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bit_depth: u16,
    /// Interleaved samples, `channel_count` per frame
    pub samples: Vec<i32>,
}

impl AudioResult {
    /// Apply metadata defaults and quantize float output to `bit_depth`.
    pub fn from_engine(output: EngineOutput) -> Result<Self, WavEncodeError> {
        let channel_count = output.channel_count.unwrap_or(DEFAULT_CHANNEL_COUNT);
        let bit_depth = output.bit_depth.unwrap_or(DEFAULT_BIT_DEPTH);

        if !matches!(bit_depth, 8 | 16 | 24 | 32) {
            return Err(WavEncodeError::UnsupportedBitDepth(bit_depth));
        }

        let samples = match output.samples {
            EngineSamples::Int(samples) => samples,
            EngineSamples::Float(samples) => {
                let full_scale = ((1i64 << (bit_depth - 1)) - 1) as f64;
                samples
                    .into_iter()
                    .map(|s| (f64::from(s.clamp(-1.0, 1.0)) * full_scale) as i32)
                    .collect()
            }
        };

        Ok(Self {
            sample_rate: output.sample_rate,
            channel_count,
            bit_depth,
            samples,
        })
    }

    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        if self.channel_count == 0 {
            return 0;
        }
        self.samples.len() / self.channel_count as usize
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frame_count() as u64 * 1000 / self.sample_rate as u64
    }
}

/// A complete RIFF/WAVE file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBuffer {
    bytes: Vec<u8>,
    sample_rate: u32,
    channel_count: u16,
    bit_depth: u16,
    duration_ms: u64,
}

impl WavBuffer {
    pub(super) fn new(bytes: Vec<u8>, audio: &AudioResult) -> Self {
        Self {
            bytes,
            sample_rate: audio.sample_rate,
            channel_count: audio.channel_count,
            bit_depth: audio.bit_depth,
            duration_ms: audio.duration_ms(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
