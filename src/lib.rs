pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod db;
pub mod domain;
pub mod entities;
pub mod services;
pub mod state;

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use services::AuthService;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            config.validate()?;
            run_server(config, prometheus_handle).await
        }
        Commands::CheckConfig => check_config(&config),
        Commands::HashPassword { password } => {
            let hash = services::credentials::hash_password(&password, &config.security)?;
            println!("{hash}");
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    println!("Configuration OK");
    println!("  database:      {}", config.general.database_path);
    println!("  images:        {}", config.general.images_path);
    println!(
        "  server:        {} (port {})",
        if config.server.enabled { "enabled" } else { "disabled" },
        config.server.port
    );
    println!("  session ttl:   {} days", config.security.session_ttl_days);
    println!(
        "  metrics:       {}",
        if config.observability.metrics_enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Geoportal v{} starting...", env!("CARGO_PKG_VERSION"));

    let server_enabled = config.server.enabled;
    let port = config.server.port;
    let purge_minutes = config.security.session_purge_interval_minutes;

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;

    let purge_handle = spawn_session_purge(state.shared.auth_service.clone(), purge_minutes);

    if server_enabled {
        let app = api::router(state).await;
        let addr = format!("0.0.0.0:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("Web server running at http://{addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Web server error")?;
    } else {
        warn!("HTTP server disabled in configuration; only background tasks are running");
        shutdown_signal().await;
    }

    if let Some(handle) = purge_handle {
        handle.abort();
    }
    info!("Geoportal stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

/// Periodically drops expired session tokens. The first pass runs at startup.
fn spawn_session_purge(auth: Arc<dyn AuthService>, minutes: u64) -> Option<JoinHandle<()>> {
    if minutes == 0 {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(minutes * 60));
        loop {
            ticker.tick().await;
            match auth.purge_expired().await {
                Ok(0) => debug!("No expired session tokens to purge"),
                Ok(removed) => info!(removed, "Purged expired session tokens"),
                Err(e) => warn!(error = %e, "Failed to purge expired session tokens"),
            }
        }
    }))
}
