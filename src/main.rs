use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use image_detect_gateway::{routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; credentials may come from the real environment
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("image_detect_gateway=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if !dotenv_loaded {
        info!("No .env file found, using process environment");
    }

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.jsonld".to_string()),
        Some("conf.json".to_string()),
        Some("conf.yaml".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (mut config, loaded_path) = Config::load_first(&config_paths)?;
    match loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => warn!("No config file found (tried {:?}), using defaults", config_paths),
    }
    config.apply_env_overrides()?;

    // Credentials are checked here; a failure stops the process before it binds
    let app_state = AppState::new(config.clone()).await?;
    let shutdown = app_state.shutdown.clone();

    let app = routes::create_app(app_state);

    let addr = config.system_config.socket_addr()?;
    info!("Starting server on {}", addr);
    info!("  POST /upload     - detect objects in an uploaded image");
    info!("  POST /translate  - translate detection labels");
    info!("  GET  /api/health - gateway and detection backend status");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, cancelling in-flight requests");
    shutdown.cancel();
}
