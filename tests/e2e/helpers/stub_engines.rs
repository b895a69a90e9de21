use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use voice_design_service::infrastructure::engines::{
    EngineError, EngineOutput, EngineSamples, SynthesisEngine,
};

/// Arguments of one engine call
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCall {
    pub text: String,
    pub language: String,
    pub instruct: String,
}

/// What a stub engine does when called
pub enum StubBehavior {
    /// One second of 440 Hz sine at 16 kHz, mono, 16-bit
    Sine,
    Fail(EngineError),
    Hang(Duration),
}

/// Deterministic engine double that records its calls
pub struct StubEngine {
    behavior: StubBehavior,
    calls: AtomicUsize,
    last_call: Mutex<Option<EngineCall>>,
    ready: bool,
}

impl StubEngine {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
            ready: true,
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::new(StubBehavior::Sine)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<EngineCall> {
        self.last_call.lock().clone()
    }
}

pub fn one_second_sine_16k() -> Vec<i32> {
    (0..16_000)
        .map(|i| {
            let t = i as f64 / 16_000.0;
            ((2.0 * std::f64::consts::PI * 440.0 * t).sin() * 16_000.0) as i32
        })
        .collect()
}

#[async_trait]
impl SynthesisEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn is_ready(&self) -> bool {
        self.ready
    }

    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        instruct: &str,
    ) -> Result<EngineOutput, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock() = Some(EngineCall {
            text: text.to_string(),
            language: language.to_string(),
            instruct: instruct.to_string(),
        });

        match &self.behavior {
            StubBehavior::Sine => Ok(EngineOutput {
                samples: EngineSamples::Int(one_second_sine_16k()),
                sample_rate: 16_000,
                channel_count: Some(1),
                bit_depth: Some(16),
            }),
            StubBehavior::Fail(err) => Err(err.clone()),
            StubBehavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(EngineOutput {
                    samples: EngineSamples::Int(vec![0; 160]),
                    sample_rate: 16_000,
                    channel_count: None,
                    bit_depth: None,
                })
            }
        }
    }
}
