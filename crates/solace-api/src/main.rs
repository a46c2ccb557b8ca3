use std::sync::Arc;
use std::time::Duration;

use solace_instruments::instruments::phq9::Phq9;
use solace_screening::flow::{Collaborators, ScreeningFlow};
use solace_screening::store::{MemorySessionStore, SessionStore};
use solace_speech::SpeechClient;
use solace_storage::objects::Bucket;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod adapters;
mod app;
mod config;
mod error;
mod middleware;
mod routes;
mod state;

use adapters::oracle::BedrockOracle;
use adapters::reports::HttpReportSink;
use adapters::sessions::S3SessionStore;
use adapters::speech::SpeechAdapter;
use adapters::transcription::TranscribeAdapter;
use config::{ServerConfig, SessionBackend};
use state::AppState;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    let sdk_config = solace_storage::client::load_sdk_config(&config.region).await;
    let bucket = Bucket::new(
        solace_storage::client::build_client(&sdk_config),
        &config.bucket,
    );

    let store: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new(config.session_ttl)),
        SessionBackend::S3 => Arc::new(S3SessionStore::new(bucket.clone(), config.session_ttl)),
    };
    spawn_purger(store.clone());

    let collaborators = Collaborators {
        oracle: Arc::new(BedrockOracle::new(
            solace_bedrock::client::build_client(&sdk_config),
            &config.model_id,
            config.chat_window,
        )),
        transcriber: Arc::new(TranscribeAdapter::new(sdk_config.clone(), bucket)),
        synthesizer: Arc::new(SpeechAdapter::new(SpeechClient::new(config.speech.clone())?)),
        reports: Arc::new(HttpReportSink::new(
            config.report_url.clone(),
            config.http_timeout,
        )?),
        store,
    };

    let state = AppState {
        flow: Arc::new(ScreeningFlow::new(Box::new(Phq9), collaborators)),
        session_ttl: config.session_ttl,
        allowed_origins: config.allowed_origins.clone(),
    };
    let app = app::router(state);

    info!(
        model_id = %config.model_id,
        bucket = %config.bucket,
        session_backend = ?config.session_backend,
        report_forwarding = config.report_url.is_some(),
        allowed_origins = config.allowed_origins.len(),
        "solace configured"
    );

    if std::env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn spawn_purger(store: Arc<dyn SessionStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "expired sessions purged"),
                Err(e) => tracing::warn!(error = %e, "session purge failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
