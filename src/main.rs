use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use url_shortener::cli::Cli;
use url_shortener::config::{get_config, init_config};
use url_shortener::interfaces::cli::run_cli_command;
use url_shortener::system::init_logging;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_config(Some(&cli.config));
    let config = get_config();

    // 日志 guard 必须存活到进程结束
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!("Configuration loaded from {}", cli.config);

    match run_cli_command(cli.command, config).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e.format_colored());
            Ok(ExitCode::FAILURE)
        }
    }
}
