//! wake-me-up - Alertmanager webhook receiver with an audible alarm

#![allow(missing_docs)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use wake_me_up::config::{Config, DEFAULT_CONFIG_PATH};
use wake_me_up::utils::logging::LoggingUtils;
use wake_me_up::{Result, WakeMeUp};

#[derive(Debug, Parser)]
#[command(name = "wake-me-up", version, about)]
struct Cli {
    /// Path to config.yaml
    #[arg(short, long, env = "WAKE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    /// Load and validate the configuration, print it and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display, not Debug, to keep multi-line messages readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_file(&cli.config).await?;
    if let Some(level) = cli.log_level {
        config.app.logging.level = level;
    }

    if cli.check_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    LoggingUtils::init_logger(config.logging())?;
    info!("Config file '{}' loaded successfully", cli.config.display());

    WakeMeUp::new(config).run().await
}
