use super::error::AudioServiceError;
use super::model::{AudioResult, PipelineStage, SynthesisRequest, WavBuffer};
use super::wav::encode_wav;
use crate::infrastructure::engines::{EngineOutput, SynthesisEngine};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

pub struct AudioService {
    engine: Arc<dyn SynthesisEngine>,
    engine_permits: Arc<Semaphore>,
    max_concurrency: usize,
    synthesis_timeout: Duration,
    cache: Option<Cache<SynthesisRequest, WavBuffer>>,
}

impl AudioService {
    pub fn new(
        engine: Arc<dyn SynthesisEngine>,
        max_concurrency: usize,
        synthesis_timeout: Duration,
        cache_enabled: bool,
    ) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        let max_concurrency = max_concurrency.max(1);

        Self {
            engine,
            engine_permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            synthesis_timeout,
            cache,
        }
    }

    /// Stop handing out engine permits and release the engine.
    ///
    /// Waits up to one synthesis timeout for in-flight engine work, then
    /// closes the guard; later requests fail with `EngineClosed`.
    pub async fn shutdown(&self) {
        let drained = tokio::time::timeout(
            self.synthesis_timeout,
            self.engine_permits.acquire_many(self.max_concurrency as u32),
        )
        .await;
        if drained.is_err() {
            tracing::warn!(
                engine = self.engine.name(),
                "Engine work still running at shutdown"
            );
        }

        self.engine_permits.close();
        self.engine.shutdown().await;
        tracing::info!(engine = self.engine.name(), "Synthesis engine shut down");
    }
}

#[async_trait]
pub trait AudioServiceApi: Send + Sync {
    /// Synthesize a validated request into a WAV file
    ///
    /// This operation:
    /// - Waits for an engine permit (bounded concurrency)
    /// - Calls the synthesis engine with the text/language/instruct triple
    /// - Encodes the samples into a RIFF/WAVE container
    ///
    /// The permit wait and the engine call together are bounded by the
    /// configured synthesis timeout.
    async fn synthesize_to_wav(
        &self,
        request: &SynthesisRequest,
    ) -> Result<WavBuffer, AudioServiceError>;
}

#[async_trait]
impl AudioServiceApi for AudioService {
    async fn synthesize_to_wav(
        &self,
        request: &SynthesisRequest,
    ) -> Result<WavBuffer, AudioServiceError> {
        let started = Instant::now();

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(request).await {
                tracing::info!(
                    language = %request.language(),
                    audio_size = cached.len(),
                    "Audio cache hit - returning cached audio"
                );
                return Ok(cached);
            }
        }

        let result = self.run_pipeline(request).await;

        match &result {
            Ok(wav) => {
                tracing::info!(
                    stage = %PipelineStage::Delivered,
                    engine = self.engine.name(),
                    audio_size = wav.len(),
                    duration_ms = wav.duration_ms(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Audio generated"
                );
            }
            Err(e) => {
                tracing::error!(
                    stage = %PipelineStage::Failed,
                    failed_during = %e.stage(),
                    engine = self.engine.name(),
                    error = ?e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Audio generation failed"
                );
            }
        }

        let wav = result?;

        if let Some(cache) = &self.cache {
            cache.insert(request.clone(), wav.clone()).await;
        }

        Ok(wav)
    }
}

impl AudioService {
    async fn run_pipeline(
        &self,
        request: &SynthesisRequest,
    ) -> Result<WavBuffer, AudioServiceError> {
        tracing::info!(
            stage = %PipelineStage::Synthesizing,
            text_chars = request.text().chars().count(),
            language = %request.language(),
            instruct = %request.instruct(),
            "Starting synthesis"
        );

        let output = self.call_engine(request).await?;

        if output.samples.is_empty() {
            return Err(AudioServiceError::EmptyAudio);
        }

        tracing::debug!(
            stage = %PipelineStage::Encoding,
            samples = output.samples.len(),
            sample_rate = output.sample_rate,
            "Encoding WAV"
        );

        let audio = AudioResult::from_engine(output)?;
        Ok(encode_wav(&audio)?)
    }

    /// Run the engine on its own task holding an owned permit.
    ///
    /// The permit is released when the engine finishes, not when the caller
    /// gives up, so timed-out work still counts against the limit.
    async fn call_engine(
        &self,
        request: &SynthesisRequest,
    ) -> Result<EngineOutput, AudioServiceError> {
        let timeout = self.synthesis_timeout;
        let deadline = tokio::time::Instant::now() + timeout;

        let permits = self.engine_permits.clone();
        let permit = tokio::time::timeout_at(deadline, permits.acquire_owned())
            .await
            .map_err(|_| AudioServiceError::Timeout(timeout))?
            .map_err(|_| AudioServiceError::EngineClosed)?;

        let engine = self.engine.clone();
        let request = request.clone();
        let inference = tokio::spawn(async move {
            let _permit = permit;
            engine
                .synthesize(request.text(), request.language(), request.instruct())
                .await
        });

        match tokio::time::timeout_at(deadline, inference).await {
            Err(_) => Err(AudioServiceError::Timeout(timeout)),
            Ok(Err(join_err)) => Err(AudioServiceError::EngineTask(join_err.to_string())),
            Ok(Ok(result)) => Ok(result?),
        }
    }
}
