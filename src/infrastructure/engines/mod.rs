pub mod error;
pub mod remote_engine;
pub mod synthesis_engine;
pub mod tone_engine;

pub use error::EngineError;
pub use remote_engine::RemoteSynthesisEngine;
pub use synthesis_engine::{EngineOutput, EngineSamples, SynthesisEngine};
pub use tone_engine::ToneEngine;

use crate::infrastructure::config::{Config, EngineKind};
use std::sync::Arc;

/// Build the process-wide engine selected by configuration
pub fn build_engine(config: &Config) -> Result<Arc<dyn SynthesisEngine>, EngineError> {
    match config.engine_kind {
        EngineKind::Remote => {
            tracing::info!(engine_url = %config.engine_url, "Using remote synthesis engine");
            Ok(Arc::new(RemoteSynthesisEngine::new(
                config.engine_url.clone(),
                config.synthesis_timeout,
            )?))
        }
        EngineKind::Tone => {
            tracing::warn!("Using built-in tone engine; output is a test tone, not speech");
            Ok(Arc::new(ToneEngine::new()))
        }
    }
}
