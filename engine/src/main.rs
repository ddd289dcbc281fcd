// Haven companion backend
// Main entry point for the haven binary

use api_server::{ApiServer, ServerOptions};
use clap::Parser;
use haven_engine::cli::Cli;
use haven_engine::config::Config;
use haven_engine::context::Services;
use haven_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log {
        config.log.level = level;
    }
    config.validate()?;

    init_telemetry_with_level(&config.log.level);

    tracing::info!("Haven v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?config, "Resolved configuration");

    let services = Services::from_config(&config)?;
    let options = ServerOptions {
        addr: config.listen_addr().await?,
        cors: config.server.cors,
    };

    let mut server = ApiServer::new(services.context(), options);
    let addr = server.start().await?;
    println!("Server running on port {}", addr.port());

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    server.stop().await;

    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}
