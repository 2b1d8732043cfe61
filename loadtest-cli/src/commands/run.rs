//! `loadtest run` handler

use anyhow::{Context, Result};
use loadtest_config::LoadTestConfig;
use loadtest_http::{HttpClient, HttpManager, HttpMethod, MockResponse};
use loadtest_runner::{render_summary, write_summary_export, RunReport, Runner};
use loadtest_scenario::LoginScenario;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

/// Exit status used when at least one threshold failed
pub const THRESHOLDS_FAILED_EXIT_CODE: u8 = 99;

/// Build the HTTP client, answering from a canned 200 when `offline`
pub fn build_client(config: &LoadTestConfig, offline: bool) -> Result<Arc<dyn HttpClient>> {
    let mut manager = HttpManager::with_config(config.http.clone().into())
        .context("Failed to create HTTP client")?;

    if offline {
        manager.set_offline();
        manager.add_mock(
            HttpMethod::Post,
            &config.target.url,
            MockResponse::new(200)
                .with_delay(Duration::from_millis(10))
                .with_body(serde_json::json!({ "message": "Login successful" })),
        );
        info!("Offline mode: answering {} from a canned response", config.target.url);
    }

    Ok(Arc::new(manager))
}

/// Run the login scenario to completion or Ctrl+C
pub async fn handle_run(
    mut config: LoadTestConfig,
    target_url: Option<&str>,
    offline: bool,
    summary_export: Option<&Path>,
) -> Result<RunReport> {
    if let Some(url) = target_url {
        config.target.url = url.to_string();
        config
            .validate_all()
            .context("Invalid --target-url")?;
    }

    let client = build_client(&config, offline)?;
    let scenario = Arc::new(LoginScenario::new(&config, client)?);
    let runner = Runner::new(scenario, config.runner.clone());

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let report = runner.run(shutdown).await.context("Load test failed")?;

    println!("{}", render_summary(&report));

    if let Some(path) = summary_export {
        write_summary_export(path, &report).context("Failed to export summary")?;
    }

    Ok(report)
}
