use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Synthesis engine
    pub engine_kind: EngineKind,
    pub engine_url: String,
    pub engine_max_concurrency: usize,
    pub synthesis_timeout: Duration,
    // Request limits
    pub max_text_chars: usize,
    // Output cache
    pub audio_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Remote,
    Tone,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Config {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", var("PORT", "8867"))?,
            environment: match var("ENVIRONMENT", "development").to_lowercase().as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            engine_kind: match var("ENGINE_KIND", "remote").to_lowercase().as_str() {
                "remote" => EngineKind::Remote,
                "tone" => EngineKind::Tone,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: "ENGINE_KIND",
                        value: other.to_string(),
                    })
                }
            },
            engine_url: var("ENGINE_URL", "http://127.0.0.1:9000"),
            engine_max_concurrency: positive(
                "ENGINE_MAX_CONCURRENCY",
                var("ENGINE_MAX_CONCURRENCY", "1"),
            )?,
            synthesis_timeout: Duration::from_secs(positive(
                "SYNTHESIS_TIMEOUT_SECS",
                var("SYNTHESIS_TIMEOUT_SECS", "120"),
            )?),
            max_text_chars: positive("MAX_TEXT_CHARS", var("MAX_TEXT_CHARS", "5000"))?,
            audio_cache_enabled: var("AUDIO_CACHE_ENABLED", "false").to_lowercase() == "true",
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

fn positive<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = parse(key, value.clone())?;
    if parsed > T::default() {
        Ok(parsed)
    } else {
        Err(ConfigError::InvalidValue { key, value })
    }
}
