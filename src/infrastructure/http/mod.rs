pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{audio::AudioController, health};
use crate::infrastructure::config::Config;
use crate::infrastructure::engines::SynthesisEngine;

/// Build the application router with all routes configured
pub fn build_router(
    engine: Arc<dyn SynthesisEngine>,
    audio_controller: Arc<AudioController>,
) -> Router {
    // Audio generation routes
    let audio_routes = Router::new()
        .route("/generate_audio", post(AudioController::generate_audio))
        .with_state(audio_controller);

    // Health routes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(engine);

    Router::new()
        .route("/", get(health::service_info))
        .merge(health_routes)
        .merge(audio_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the router until Ctrl-C or SIGTERM
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), std::io::Error> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped accepting requests");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
