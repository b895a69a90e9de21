use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::audio::{AudioService, AudioServiceApi, PipelineStage, SynthesisRequest},
    error::{AppError, AppResult},
};

const WAV_CONTENT_TYPE: &str = "audio/wav";
const WAV_DISPOSITION: &str = "attachment; filename=generated_audio.wav";

/// Query parameters for POST /generate_audio
///
/// Every field is optional at the extractor level so that missing values
/// produce a validation message naming the field.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateAudioParams {
    pub text: Option<String>,
    pub language: Option<String>,
    pub instruct: Option<String>,
}

pub struct AudioController {
    audio_service: Arc<AudioService>,
    max_text_chars: usize,
    expose_error_detail: bool,
}

impl AudioController {
    pub fn new(
        audio_service: Arc<AudioService>,
        max_text_chars: usize,
        expose_error_detail: bool,
    ) -> Self {
        Self {
            audio_service,
            max_text_chars,
            expose_error_detail,
        }
    }

    /// POST /generate_audio - Synthesize text with a described voice
    pub async fn generate_audio(
        State(controller): State<Arc<AudioController>>,
        query: Result<Query<GenerateAudioParams>, QueryRejection>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        tracing::debug!(stage = %PipelineStage::Validating, "Validating audio request");

        let Query(params) =
            query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        // Reject before any engine work
        let request = SynthesisRequest::parse(
            params.text.as_deref(),
            params.language.as_deref(),
            params.instruct.as_deref(),
            controller.max_text_chars,
        )?;

        let wav = controller
            .audio_service
            .synthesize_to_wav(&request)
            .await
            .map_err(|e| controller.client_error(e.into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(WAV_CONTENT_TYPE));
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static(WAV_DISPOSITION),
        );
        headers.insert("x-sample-rate", HeaderValue::from(wav.sample_rate()));
        headers.insert("x-audio-duration-ms", HeaderValue::from(wav.duration_ms()));

        Ok((StatusCode::OK, headers, Body::from(wav.into_bytes())))
    }

    fn client_error(&self, err: AppError) -> AppError {
        if self.expose_error_detail {
            err
        } else {
            err.redacted()
        }
    }
}
