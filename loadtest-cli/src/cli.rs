//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use loadtest_config::LogFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Ramp virtual users against a login endpoint", long_about = None)]
pub struct Cli {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Override the configured log format
    #[arg(long, value_name = "FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the login scenario through its load profile
    Run {
        /// Path to configuration file
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Login endpoint to target instead of the configured one
        #[arg(long, value_name = "URL")]
        target_url: Option<String>,

        /// Answer every request from a canned 200 response instead of the network
        #[arg(long)]
        offline: bool,

        /// Write the end-of-run summary as JSON
        #[arg(long, value_name = "PATH")]
        summary_export: Option<PathBuf>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration a run would use
    Show {
        /// Path to configuration file (optional, defaults plus environment overrides otherwise)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,

        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}
