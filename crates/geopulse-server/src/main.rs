use anyhow::Result;
use chrono::Utc;
use geopulse_ai::{GatewayProvider, RiskAssessor};
use geopulse_storage::GeoStore;
use geopulse_weather::WeatherClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing_subscriber::EnvFilter;

use geopulse_server::app;
use geopulse_server::config::{self, ServerConfig};
use geopulse_server::hazard::evaluator::HazardEvaluator;
use geopulse_server::hazard::scheduler::EvaluationScheduler;
use geopulse_server::state::AppState;
use geopulse_server::weather::ingestor::WeatherIngestor;
use geopulse_server::weather::scheduler::IngestScheduler;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  geopulse-server [config.toml]      Start the server (default config/server.toml)");
}

#[tokio::main]
async fn main() -> Result<()> {
    geopulse_common::id::init(1, 1);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("geopulse=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args
                .get(1)
                .map(|s| s.as_str())
                .unwrap_or("config/server.toml");
            run_server(config_path).await
        }
    }
}

fn build_assessor(config: &ServerConfig) -> Result<Option<Arc<dyn RiskAssessor>>> {
    if !config.ai.enabled {
        tracing::info!("AI enrichment disabled, alerts will carry no assessments");
        return Ok(None);
    }
    // config validation guarantees the key is present when enabled
    let api_key = config.ai.api_key.clone().unwrap_or_default();
    let provider = GatewayProvider::new(
        api_key,
        config.ai.model.clone(),
        config.ai.base_url.clone(),
        Some(config.ai.timeout_secs),
        config.ai.max_tokens,
        config.ai.temperature,
    )?;
    tracing::info!(model = %provider.model_name(), "AI enrichment enabled");
    Ok(Some(Arc::new(provider)))
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = config::ServerConfig::load(config_path)?;

    tracing::info!(
        http_port = config.http_port,
        data_dir = %config.database.data_dir,
        db = %config.database.redacted_url(),
        "geopulse-server starting"
    );

    // Build components
    std::fs::create_dir_all(&config.database.data_dir)?;
    let store = Arc::new(GeoStore::new(&config.database.connection_url()).await?);
    let weather = Arc::new(WeatherClient::new(
        config.weather.forecast_url.clone(),
        config.weather.geocoding_url.clone(),
        config.weather.timeout_secs,
    )?);
    let assessor = build_assessor(&config)?;

    // Default admin account: create if users table is empty
    match store.count_users().await {
        Ok(0) => {
            let password_hash = geopulse_storage::auth::hash_password(&config.auth.default_password)?;
            match store
                .create_user(&config.auth.default_username, &password_hash)
                .await
            {
                Ok(_) => {
                    tracing::info!(
                        username = %config.auth.default_username,
                        "Created default admin account"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create default admin account");
                }
            }
        }
        Ok(count) => {
            tracing::info!(
                count,
                "Users table already has accounts, skipping default admin creation"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to check users table");
        }
    }

    // JWT secret: use configured value or generate random
    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => Arc::new(secret.clone()),
        None => {
            let secret = geopulse_storage::auth::generate_secret();
            tracing::warn!("No jwt_secret configured. A random secret was generated and will change on restart. Set [auth].jwt_secret in config for production use.");
            Arc::new(secret)
        }
    };

    let state = AppState {
        store: store.clone(),
        weather: weather.clone(),
        assessor: assessor.clone(),
        jwt_secret,
        token_expire_secs: config.auth.token_expire_secs,
        start_time: Utc::now(),
        config: Arc::new(config.clone()),
    };

    // HTTP server
    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let app = app::build_http_app(state.clone());
    let http_listener = tokio::net::TcpListener::bind(http_addr).await?;
    let http_server = axum::serve(http_listener, app);

    // Periodic observation retention cleanup
    let retention_days = config.retention_days;
    let cleanup_store = store.clone();
    let cleanup_handle = tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(3600)); // Every hour
        loop {
            tick.tick().await;
            match cleanup_store.cleanup_observations(retention_days).await {
                Ok(removed) if removed > 0 => {
                    tracing::info!(removed, "Cleaned up expired observations")
                }
                Err(e) => tracing::error!(error = %e, "Observation cleanup failed"),
                _ => {}
            }
        }
    });

    // Weather ingestion scheduler
    let ingest_handle = if config.ingest.enabled {
        let ingestor = Arc::new(WeatherIngestor::new(store.clone(), weather.clone()));
        let scheduler = IngestScheduler::new(ingestor, config.ingest.interval_secs);
        Some(tokio::spawn(async move {
            scheduler.run().await;
        }))
    } else {
        tracing::info!("Weather ingestion scheduler disabled");
        None
    };

    // Hazard evaluation scheduler
    let evaluation_handle = if config.evaluation.enabled {
        let evaluator = Arc::new(HazardEvaluator::new(store.clone(), assessor));
        let scheduler = EvaluationScheduler::new(evaluator, config.evaluation.interval_secs);
        Some(tokio::spawn(async move {
            scheduler.run().await;
        }))
    } else {
        tracing::info!("Hazard evaluation scheduler disabled");
        None
    };

    tracing::info!(http = %http_addr, "Server started");

    tokio::select! {
        result = http_server.with_graceful_shutdown(async { signal::ctrl_c().await.ok(); }) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server error");
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    cleanup_handle.abort();
    if let Some(h) = ingest_handle {
        h.abort();
    }
    if let Some(h) = evaluation_handle {
        h.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}
