//! Subcommand handlers

pub mod config;
pub mod run;

use anyhow::{Context, Result};
use loadtest_config::{ConfigLoader, LoadTestConfig};
use std::path::Path;

/// Load configuration from a file, or from defaults and `LOADTEST_*` overrides
pub fn load_config(config_file: Option<&Path>) -> Result<LoadTestConfig> {
    let loader = ConfigLoader::new();
    match config_file {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}
