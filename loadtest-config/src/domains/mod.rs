//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod profile;
pub mod runner;
pub mod target;
pub mod thresholds;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Complete load test configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoadTestConfig {
    /// Ramp stages
    #[serde(default)]
    pub profile: profile::LoadProfile,

    /// Pass/fail gates evaluated at the end of the run
    #[serde(default)]
    pub thresholds: thresholds::ThresholdSet,

    /// Login endpoint and request generation
    #[serde(default)]
    pub target: target::TargetConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Virtual user scheduling
    #[serde(default)]
    pub runner: runner::RunnerConfig,
}

impl LoadTestConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.profile.validate()?;
        self.thresholds.validate()?;
        self.target.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.runner.validate()?;

        if self.http.timeout <= self.target.max_response_time {
            log::warn!(
                "http.timeout ({:?}) does not exceed target.max_response_time ({:?}); slow responses will surface as timeouts",
                self.http.timeout,
                self.target.max_response_time
            );
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = LoadTestConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
