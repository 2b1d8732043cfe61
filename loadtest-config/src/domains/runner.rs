//! Virtual user scheduling configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the runner drives virtual users through the load profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// How often the VU count is reconciled with the schedule
    #[serde(with = "humantime_serde", default = "default_tick_interval")]
    pub tick_interval: Duration,

    /// Time running iterations get to finish once the profile has ended
    #[serde(with = "humantime_serde", default = "default_graceful_stop")]
    pub graceful_stop: Duration,

    /// Time a VU removed by a ramp-down gets to finish its iteration
    #[serde(with = "humantime_serde", default = "default_graceful_ramp_down")]
    pub graceful_ramp_down: Duration,

    /// Seed for username generation and log sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_interval(),
            graceful_stop: default_graceful_stop(),
            graceful_ramp_down: default_graceful_ramp_down(),
            seed: None,
        }
    }
}

impl Validatable for RunnerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(
            self.tick_interval.as_millis(),
            "tick_interval",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "runner"
    }
}

fn default_tick_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_graceful_stop() -> Duration {
    Duration::from_secs(30)
}

fn default_graceful_ramp_down() -> Duration {
    Duration::from_secs(30)
}
