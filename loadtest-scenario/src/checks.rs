//! Per-iteration checks
//!
//! Checks never stop an iteration. Both are evaluated and recorded for every
//! request regardless of the other's outcome.

use crate::metrics::RequestSample;
use loadtest_config::TargetConfig;
use std::time::Duration;

/// Outcome of one named check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
}

/// The status and latency checks applied to every login response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checks {
    accepted_statuses: Vec<u16>,
    max_response_time: Duration,
    status_name: String,
    latency_name: String,
}

impl Checks {
    pub fn new(accepted_statuses: Vec<u16>, max_response_time: Duration) -> Self {
        let status_name = format!("status is {}", join_alternatives(&accepted_statuses));
        let latency_name = format!("response time < {}ms", max_response_time.as_millis());
        Self {
            accepted_statuses,
            max_response_time,
            status_name,
            latency_name,
        }
    }

    pub fn status_name(&self) -> &str {
        &self.status_name
    }

    pub fn latency_name(&self) -> &str {
        &self.latency_name
    }

    pub fn evaluate(&self, sample: &RequestSample) -> [CheckResult; 2] {
        [
            CheckResult {
                name: self.status_name.clone(),
                passed: self.accepted_statuses.contains(&sample.status),
            },
            CheckResult {
                name: self.latency_name.clone(),
                passed: sample.duration < self.max_response_time,
            },
        ]
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::from(&TargetConfig::default())
    }
}

impl From<&TargetConfig> for Checks {
    fn from(config: &TargetConfig) -> Self {
        Self::new(config.accepted_statuses.clone(), config.max_response_time)
    }
}

// "200", "200 or 401", "200, 401 or 403"
fn join_alternatives(statuses: &[u16]) -> String {
    match statuses {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(u16::to_string).collect();
            format!("{} or {}", head.join(", "), last)
        }
    }
}
