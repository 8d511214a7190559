//! Task Manager
//!
//! HTTP service for creating, listing, updating and deleting tasks kept in a
//! local SQLite database.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use task_manager::api;
use task_manager::cli::{Cli, Command};
use task_manager::config::Config;
use task_manager::db::Database;
use task_manager::logging::{self, LogTarget};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::resolve(cli.config.as_deref())?;

    // Override from CLI arguments
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.clone();
    }
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.ensure_db_dir()?;
    let db = Database::open(&config.server.db_path)?;

    match cli.command {
        Some(Command::Init) => {
            let count = db.task_count()?;
            info!(
                path = %config.server.db_path.display(),
                tasks = count,
                "Database ready"
            );
        }
        Some(Command::Serve) | None => {
            let addr = config.listen_addr()?;
            api::serve(Arc::new(db), addr, shutdown_signal()).await?;
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
