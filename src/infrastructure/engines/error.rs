/// Failures reported by a synthesis engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("engine rejected request: {0}")]
    Rejected(String),

    #[error("malformed engine response: {0}")]
    MalformedResponse(String),

    #[error("engine error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EngineError::MalformedResponse(err.to_string())
        } else if err.is_connect() || err.is_timeout() {
            EngineError::Unavailable(err.to_string())
        } else {
            EngineError::Internal(err.to_string())
        }
    }
}
