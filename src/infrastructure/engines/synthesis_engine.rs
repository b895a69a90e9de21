use super::error::EngineError;
use async_trait::async_trait;

/// Raw sample data as produced by an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSamples {
    /// Signed PCM values already scaled to the reported bit depth.
    Int(Vec<i32>),
    /// Normalized samples in [-1.0, 1.0], quantized by the caller.
    Float(Vec<f32>),
}

impl EngineSamples {
    pub fn len(&self) -> usize {
        match self {
            EngineSamples::Int(samples) => samples.len(),
            EngineSamples::Float(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What an engine hands back for one synthesis call.
///
/// Channel count and bit depth are optional; engines that do not report
/// them get mono 16-bit.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub samples: EngineSamples,
    pub sample_rate: u32,
    pub channel_count: Option<u16>,
    pub bit_depth: Option<u16>,
}

/// A text-to-speech engine steered by a natural-language voice instruction.
///
/// The engine is loaded once per process and shared by every request.
/// Implementations are not assumed to be re-entrant: callers serialize
/// access through the audio service's concurrency guard.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Prepare the engine before the server starts accepting requests
    ///
    /// # Errors
    /// Returns error if the engine cannot be reached or loaded
    async fn warm_up(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Whether the engine can take requests right now
    async fn is_ready(&self) -> bool {
        true
    }

    /// Synthesize `text` in `language`, with a voice described by `instruct`
    ///
    /// # Arguments
    /// * `text` - The text to speak (non-blank)
    /// * `language` - Engine language tag, passed through opaquely
    /// * `instruct` - Free-form description of the desired voice
    ///
    /// # Errors
    /// Returns error if the engine rejects the input or fails internally
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        instruct: &str,
    ) -> Result<EngineOutput, EngineError>;

    /// Release engine resources; called once after the server stops
    async fn shutdown(&self) {}
}
