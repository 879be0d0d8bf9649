//! reqwatch-server - Meeting-request store and HTTP API
//!
//! Hosts the SQLite-backed store behind a public submission endpoint and an
//! admin read endpoint protected by a shared secret. The admin console
//! (reqwatch-console) polls the read endpoint.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use reqwatch_common::config::{database_path, resolve_data_dir};
use reqwatch_server::{build_router, db, AppState};

/// Command-line arguments for reqwatch-server
#[derive(Parser, Debug)]
#[command(name = "reqwatch-server")]
#[command(about = "Meeting-request store and admin API")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5780", env = "REQWATCH_PORT")]
    port: u16,

    /// Data folder holding the database (defaults to the platform data dir)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Shared secret for the admin read API
    #[arg(long, env = "REQWATCH_ADMIN_SECRET", default_value = "")]
    admin_secret: String,
}

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
        "Starting reqwatch-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), "REQWATCH_DATA_DIR");
    let db_path = database_path(&data_dir);
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    if args.admin_secret.is_empty() {
        warn!("No admin secret configured - all admin reads will be rejected");
        warn!("Set REQWATCH_ADMIN_SECRET (or --admin-secret) to enable the admin API");
    } else {
        info!("✓ Admin secret configured");
    }

    let state = AppState::new(pool, args.admin_secret);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("reqwatch-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
