// Bike Sharing Dashboard - Web Server
// Read-only JSON API over the loaded datasets

use anyhow::{Context, Result};
use bike_dashboard::api::{build_router, AppState};
use bike_dashboard::{init_tracing, ConfigArgs, DashboardService, VERSION};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bike-dashboard-server")]
#[command(version = VERSION)]
#[command(about = "JSON API for the bike sharing dashboard")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = cli.config.resolve().context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&format!("{},tower_http=debug", config.logging.level));
    tracing::info!("Starting bike dashboard server v{}", VERSION);

    // No data, no dashboard
    let service = DashboardService::load(&config.data).map_err(|e| {
        tracing::error!(error = %e, "Data unavailable");
        e
    })?;

    let overview = service.overview();
    tracing::info!(
        daily = overview.daily_records,
        hourly = overview.hourly_records,
        page_size = service.page_size(),
        "Datasets loaded"
    );

    let app = build_router(AppState::new(service));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("API: http://{}/api/charts", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
