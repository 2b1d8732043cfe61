mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{handle_config_generate, handle_config_show, handle_config_validate};
use commands::run::{handle_run, THRESHOLDS_FAILED_EXIT_CODE};
use commands::load_config;
use loadtest_config::LogLevel;
use loadtest_logging::{init_logging_from_config, init_simple_tracing};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            config,
            target_url,
            offline,
            summary_export,
        }) => {
            let mut config = load_config(config.as_deref())?;
            if let Some(level) = &cli.log_level {
                config.logging.level = level
                    .parse::<LogLevel>()
                    .map_err(|e| anyhow::anyhow!(e))
                    .context("Invalid --log-level")?;
            }
            if let Some(format) = cli.log_format {
                config.logging.format = format;
            }
            init_logging_from_config(&config.logging)?;
            info!("loadtest starting");

            let report = handle_run(
                config,
                target_url.as_deref(),
                offline,
                summary_export.as_deref(),
            )
            .await?;

            if report.thresholds_passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                error!("Some thresholds have failed");
                Ok(ExitCode::from(THRESHOLDS_FAILED_EXIT_CODE))
            }
        }
        Some(Commands::Config { config_cmd }) => {
            init_simple_tracing(cli.log_level.as_deref().unwrap_or("warn"))?;
            match config_cmd {
                ConfigCommands::Validate { config_file } => handle_config_validate(&config_file)?,
                ConfigCommands::Generate { output, force } => {
                    handle_config_generate(&output, force)?
                }
                ConfigCommands::Show {
                    config_file,
                    format,
                } => handle_config_show(config_file.as_deref(), &format)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(ExitCode::SUCCESS)
        }
    }
}
