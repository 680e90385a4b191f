//! quotes-web - Quote board HTTP service
//!
//! Serves weighted random quotes, accepts submissions with duplicate
//! detection, records like/dislike votes and lists top and matching quotes.

use anyhow::{Context, Result};
use clap::Parser;
use quotes_common::config::{
    database_path, load_config, resolve_port, resolve_root_folder, CONFIG_ENV_VAR, PORT_ENV_VAR,
    ROOT_FOLDER_ENV_VAR,
};
use quotes_common::db::init_database;
use quotes_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quotes-web", version, about = "Quote board HTTP service")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Folder holding quotes.db
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Log build identification immediately after tracing init
    info!(
        "Starting quotes-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV_VAR, &config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let deduplicator = config.deduplicator();
    info!(
        "Near-duplicate threshold {}, {} quotes per source",
        deduplicator.fuzzy_threshold(),
        deduplicator.source_capacity()
    );

    let state = AppState::new(pool, deduplicator, config.selection.top_limit);
    let app = build_router(state);

    let port = resolve_port(args.port, PORT_ENV_VAR, &config)?;
    let addr = format!("{}:{}", config.bind_address, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("quotes-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
