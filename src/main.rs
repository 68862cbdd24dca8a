use anyhow::{Context, Result};
use clap::Parser;
use jobfinder::admin_cli::{handle_admin_command, Cli, Command};
use jobfinder::app_log;
use jobfinder::{core::ConfigManager, start_web_server};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "jobfinder=info,rocket::server=off";

/// Human-readable logs on stdout, plus JSON lines in `log_file` when set
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load()?;
    init_logging(config.log_file.as_deref())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            app_log!(info, "Server: http://0.0.0.0:{}", config.port);
            start_web_server(config).await
        }
        admin => handle_admin_command(admin, &config).await,
    }
}
