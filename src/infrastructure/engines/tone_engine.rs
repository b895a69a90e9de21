use super::error::EngineError;
use super::synthesis_engine::{EngineOutput, EngineSamples, SynthesisEngine};
use async_trait::async_trait;

const TONE_SAMPLE_RATE: u32 = 24_000;
const LEAD_IN_SECONDS: f32 = 0.25;
const SECONDS_PER_CHAR: f32 = 0.12;
const MAX_SECONDS: f32 = 30.0;
const AMPLITUDE: f32 = 0.3;

/// Deterministic stand-in engine that renders a sine tone.
///
/// Length follows the text, pitch follows the instruction. Useful for
/// running the service without a model.
pub struct ToneEngine;

impl ToneEngine {
    pub fn new() -> Self {
        Self
    }

    fn frequency_for(instruct: &str) -> f32 {
        let spread = instruct.chars().map(|c| c as u32).fold(0u32, u32::wrapping_add) % 220;
        220.0 + spread as f32
    }

    fn render(text: &str, instruct: &str) -> Vec<f32> {
        let chars = text.chars().count() as f32;
        let seconds = (LEAD_IN_SECONDS + SECONDS_PER_CHAR * chars).min(MAX_SECONDS);
        let frames = (seconds * TONE_SAMPLE_RATE as f32) as usize;
        let frequency = Self::frequency_for(instruct);

        (0..frames)
            .map(|i| {
                let t = i as f32 / TONE_SAMPLE_RATE as f32;
                AMPLITUDE * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }
}

impl Default for ToneEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SynthesisEngine for ToneEngine {
    fn name(&self) -> &'static str {
        "tone"
    }

    async fn synthesize(
        &self,
        text: &str,
        _language: &str,
        instruct: &str,
    ) -> Result<EngineOutput, EngineError> {
        Ok(EngineOutput {
            samples: EngineSamples::Float(Self::render(text, instruct)),
            sample_rate: TONE_SAMPLE_RATE,
            channel_count: None,
            bit_depth: None,
        })
    }
}
