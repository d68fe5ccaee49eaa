// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Columbus - chat with an image-analysis assistant from the terminal.
//!
//! This is the binary entry point for the Columbus client.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod files;
mod health;
mod shell;
mod upload;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use columbus_client::HttpTransport;
use columbus_config::model::ColumbusConfig;
use columbus_core::ColumbusError;
use columbus_session::ModeCatalog;

/// Columbus - chat with an image-analysis assistant.
#[derive(Parser, Debug)]
#[command(name = "columbus", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat (the default).
    Chat {
        /// Analysis mode to start in.
        #[arg(long)]
        mode: Option<String>,
        /// Image files to attach before the first message.
        files: Vec<PathBuf>,
    },
    /// Check that the server is reachable and healthy.
    Health,
    /// List the configured analysis modes.
    Modes,
    /// Upload image files to the server.
    Upload {
        /// Ask the server to keep the files.
        #[arg(long)]
        store: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => columbus_config::load_and_validate_path(path),
        None => columbus_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            columbus_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    tracing::debug!(base_url = %config.api.base_url, "config loaded");

    if let Some(Commands::Chat { mode: Some(id), .. }) = &cli.command {
        let catalog = ModeCatalog::from_config(&config.session);
        if let Err(e) = shell::check_mode(&catalog, "--mode", id) {
            columbus_config::render_errors(&[e]);
            std::process::exit(1);
        }
    }

    let result = match cli.command {
        Some(Commands::Chat { mode, files }) => shell::run_chat(config, mode, files).await,
        None => shell::run_chat(config, None, Vec::new()).await,
        Some(Commands::Health) => run_health(&config).await,
        Some(Commands::Modes) => {
            let catalog = ModeCatalog::from_config(&config.session);
            shell::print_modes(&catalog, catalog.initial());
            Ok(())
        }
        Some(Commands::Upload { store, files }) => {
            let store = store || config.session.store_files;
            match HttpTransport::new(&config) {
                Ok(transport) => upload::run_upload(&transport, &files, store).await.map(|_| ()),
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red(), e.user_detail());
        std::process::exit(1);
    }
}

async fn run_health(config: &ColumbusConfig) -> Result<(), ColumbusError> {
    let transport = HttpTransport::new(config)?;
    if !health::run_health(&transport).await? {
        std::process::exit(2);
    }
    Ok(())
}

/// Logs go to stderr so they never interleave with chat output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("columbus={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
