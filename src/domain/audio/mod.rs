pub mod error;
pub mod model;
pub mod service;
pub mod wav;

pub use error::{AudioServiceError, WavEncodeError};
pub use model::{AudioResult, PipelineStage, SynthesisRequest, WavBuffer, DEFAULT_LANGUAGE};
pub use service::{AudioService, AudioServiceApi};
pub use wav::encode_wav;
