use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_design_service::controllers::audio::AudioController;
use voice_design_service::domain::audio::AudioService;
use voice_design_service::infrastructure::config::{Config, LogFormat};
use voice_design_service::infrastructure::engines::build_engine;
use voice_design_service::infrastructure::http::{build_router, start_http_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("failed to load configuration")?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Voice Design Service on {}:{}",
        config.host,
        config.port
    );

    // Load the engine before accepting any request
    let engine = build_engine(&config).context("failed to create synthesis engine")?;
    engine
        .warm_up()
        .await
        .with_context(|| format!("synthesis engine '{}' failed to warm up", engine.name()))?;
    tracing::info!(
        engine = engine.name(),
        max_concurrency = config.engine_max_concurrency,
        synthesis_timeout_secs = config.synthesis_timeout.as_secs(),
        "Synthesis engine ready"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let audio_service = Arc::new(AudioService::new(
        engine.clone(),
        config.engine_max_concurrency,
        config.synthesis_timeout,
        config.audio_cache_enabled,
    ));
    let audio_controller = Arc::new(AudioController::new(
        audio_service.clone(),
        config.max_text_chars,
        config.is_development(),
    ));

    let app = build_router(engine, audio_controller);
    let served = start_http_server(config, app).await;

    // Release the engine even if the server failed
    audio_service.shutdown().await;

    served.context("HTTP server failed")?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voice_design_service=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
