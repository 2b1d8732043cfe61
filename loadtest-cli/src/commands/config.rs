//! `loadtest config` handlers

use super::load_config;
use anyhow::{Context, Result};
use loadtest_config::LoadTestConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Handle configuration validation
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {}", config_file.display());

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {}",
            config_file.display()
        ));
    }

    match load_config(Some(config_file)) {
        Ok(config) => {
            println!("✅ Configuration file is valid");
            println!(
                "   {} stages over {:?}, peak {} VUs, {} thresholds, target {}",
                config.profile.stages.len(),
                config.profile.total_duration(),
                config.profile.peak_vus(),
                config.thresholds.len(),
                config.target.url
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

/// Handle sample configuration generation
pub fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating sample configuration at: {}", output.display());

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, LoadTestConfig::generate_sample())
        .context("Failed to write configuration file")?;

    println!("✅ Sample configuration generated at: {}", output.display());
    println!(
        "🔧 Validate with: loadtest config validate --config-file {}",
        output.display()
    );

    Ok(())
}

/// Render the effective configuration
pub fn render_config(config: &LoadTestConfig, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(config).context("Failed to serialize to YAML"),
        "json" => serde_json::to_string_pretty(config).context("Failed to serialize to JSON"),
        _ => Err(anyhow::anyhow!(
            "Unknown output format: {}. Valid formats: yaml, json",
            format
        )),
    }
}

/// Handle configuration display
pub fn handle_config_show(config_file: Option<&Path>, format: &str) -> Result<()> {
    info!("Showing configuration (format: {})", format);

    let config = load_config(config_file)?;
    println!("{}", render_config(&config, format)?);

    Ok(())
}
