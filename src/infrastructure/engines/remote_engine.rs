use super::error::EngineError;
use super::synthesis_engine::{EngineOutput, EngineSamples, SynthesisEngine};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for `GET /health`, independent of the synthesis timeout
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Request body for `POST {base_url}/synthesize`
#[derive(Debug, Serialize)]
struct RemoteSynthesisRequest<'a> {
    text: &'a str,
    language: &'a str,
    instruct: &'a str,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RemoteEncoding {
    PcmF32,
    PcmI32,
}

/// Response body of the inference server
#[derive(Debug, Deserialize)]
struct RemoteSynthesisResponse {
    sample_rate: u32,
    #[serde(default)]
    channels: Option<u16>,
    #[serde(default)]
    bit_depth: Option<u16>,
    encoding: RemoteEncoding,
    samples: Vec<f64>,
}

/// Error body returned by the inference server on non-2xx responses
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(alias = "detail", alias = "error")]
    message: String,
}

/// Voice-design engine hosted by a separate inference server.
///
/// The model process owns the accelerator; this client only marshals the
/// text/language/instruction triple and decodes the returned samples.
pub struct RemoteSynthesisEngine {
    client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl RemoteSynthesisEngine {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| EngineError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            health_timeout: HEALTH_CHECK_TIMEOUT,
        })
    }

    pub fn with_health_timeout(mut self, health_timeout: Duration) -> Self {
        self.health_timeout = health_timeout;
        self
    }

    async fn check_health(&self) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(self.url("/health"))
            .timeout(self.health_timeout)
            .send()
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decode_samples(response: RemoteSynthesisResponse) -> Result<EngineOutput, EngineError> {
        let samples = match response.encoding {
            RemoteEncoding::PcmF32 => {
                EngineSamples::Float(response.samples.iter().map(|&s| s as f32).collect())
            }
            RemoteEncoding::PcmI32 => {
                let ints = response
                    .samples
                    .iter()
                    .map(|&s| {
                        if s.fract() == 0.0 && s >= i32::MIN as f64 && s <= i32::MAX as f64 {
                            Ok(s as i32)
                        } else {
                            Err(EngineError::MalformedResponse(format!(
                                "sample {} is not a 32-bit integer",
                                s
                            )))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                EngineSamples::Int(ints)
            }
        };

        Ok(EngineOutput {
            samples,
            sample_rate: response.sample_rate,
            channel_count: response.channels,
            bit_depth: response.bit_depth,
        })
    }
}

#[async_trait]
impl SynthesisEngine for RemoteSynthesisEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn warm_up(&self) -> Result<(), EngineError> {
        tracing::info!(base_url = %self.base_url, "Checking remote inference server");

        let response = self.check_health().await?;
        if !response.status().is_success() {
            return Err(EngineError::Unavailable(format!(
                "health check returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn is_ready(&self) -> bool {
        match self.check_health().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Remote inference server health check failed");
                false
            }
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        instruct: &str,
    ) -> Result<EngineOutput, EngineError> {
        let response = self
            .client
            .post(self.url("/synthesize"))
            .json(&RemoteSynthesisRequest {
                text,
                language,
                instruct,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RemoteErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);

            return Err(if status.is_client_error() {
                EngineError::Rejected(message)
            } else {
                EngineError::Internal(format!("{}: {}", status, message))
            });
        }

        let body: RemoteSynthesisResponse = response.json().await?;
        Self::decode_samples(body)
    }
}
