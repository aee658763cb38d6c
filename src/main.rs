//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ikuai_exporter` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ikuai_exporter::initialization::init_logger_with;
use ikuai_exporter::{run_exporter, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try the current directory first, then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("ikuai_exporter error: invalid configuration: {}", e);
        process::exit(2);
    }

    let log_level = config.effective_log_level();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_exporter(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("ikuai_exporter stopped: {:#}", e);
            eprintln!("ikuai_exporter error: {:#}", e);
            process::exit(1);
        }
    }
}
