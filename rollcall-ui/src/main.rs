//! rollcall-ui - QR code attendance check-in service
//!
//! Binds the public check-in form and the loopback-only operator pages
//! around the recording engine. On first run the durable record table is
//! created from the roster source; after that the existing table is reused.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use rollcall_core::RecordingEngine;
use rollcall_ui::config::Cli;
use rollcall_ui::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Rollcall (rollcall-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::resolve(Cli::parse());
    info!("Roster source: {}", config.roster.display());
    info!("Record table: {}", config.table.display());

    // Bootstrap: create the record table from the roster on first run only
    match rollcall_core::roster::ensure_record_table(&config.roster, &config.table) {
        Ok(true) => info!("✓ Record table initialized from roster"),
        Ok(false) => info!("✓ Record table already present"),
        Err(e) => {
            error!("Failed to initialize record table: {}", e);
            return Err(e.into());
        }
    }

    let engine = Arc::new(RecordingEngine::with_lock_wait(
        &config.table,
        config.lock_wait,
    ));
    let state = AppState::new(engine, config.port);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("rollcall-ui listening on http://0.0.0.0:{}", config.port);
    info!("Operator page: http://localhost:{}/private", config.port);

    if config.open_browser {
        let url = format!("http://localhost:{}/private", config.port);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if let Err(e) = webbrowser::open(&url) {
                warn!("Could not open browser: {}", e);
            }
        });
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
