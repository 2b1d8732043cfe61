//! Login target configuration

use crate::error::ConfigResult;
use crate::validation::{
    validate_positive, validate_probability, validate_required_string, validate_url, Validatable,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What each iteration sends and how its response is judged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Login endpoint
    #[serde(default = "default_url")]
    pub url: String,

    /// Suffix appended to the zero-padded user id
    #[serde(default = "default_username_domain")]
    pub username_domain: String,

    /// Password sent with every login
    #[serde(default = "default_password")]
    pub password: String,

    /// Width of the zero-padded numeric username part
    #[serde(default = "default_username_width")]
    pub username_width: usize,

    /// Smallest user id drawn (inclusive)
    #[serde(default = "default_min_user_id")]
    pub min_user_id: u64,

    /// Largest user id drawn (inclusive)
    #[serde(default = "default_max_user_id")]
    pub max_user_id: u64,

    /// Statuses the status check accepts
    #[serde(default = "default_accepted_statuses")]
    pub accepted_statuses: Vec<u16>,

    /// Bound for the latency check
    #[serde(with = "humantime_serde", default = "default_max_response_time")]
    pub max_response_time: Duration,

    /// Probability of logging an iteration's username and status
    #[serde(default = "default_log_sample_rate")]
    pub log_sample_rate: f64,

    /// Pause at the end of every iteration
    #[serde(with = "humantime_serde", default = "default_think_time")]
    pub think_time: Duration,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username_domain: default_username_domain(),
            password: default_password(),
            username_width: default_username_width(),
            min_user_id: default_min_user_id(),
            max_user_id: default_max_user_id(),
            accepted_statuses: default_accepted_statuses(),
            max_response_time: default_max_response_time(),
            log_sample_rate: default_log_sample_rate(),
            think_time: default_think_time(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.url, "url", self.domain_name())?;
        validate_required_string(&self.username_domain, "username_domain", self.domain_name())?;
        validate_required_string(&self.password, "password", self.domain_name())?;
        validate_positive(self.username_width, "username_width", self.domain_name())?;
        validate_positive(self.min_user_id, "min_user_id", self.domain_name())?;

        if self.max_user_id < self.min_user_id {
            return Err(self.validation_error(format!(
                "max_user_id ({}) must not be lower than min_user_id ({})",
                self.max_user_id, self.min_user_id
            )));
        }

        if self.accepted_statuses.is_empty() {
            return Err(self.validation_error("accepted_statuses cannot be empty"));
        }

        if let Some(status) = self
            .accepted_statuses
            .iter()
            .find(|s| !(100..=599).contains(*s))
        {
            return Err(self.validation_error(format!("{} is not an HTTP status code", status)));
        }

        validate_positive(
            self.max_response_time.as_millis(),
            "max_response_time",
            self.domain_name(),
        )?;
        validate_probability(self.log_sample_rate, "log_sample_rate", self.domain_name())?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

// Default value functions
fn default_url() -> String {
    "http://localhost:8080/login".to_string()
}

fn default_username_domain() -> String {
    "@katakode.com".to_string()
}

fn default_password() -> String {
    "testpassword123".to_string()
}

fn default_username_width() -> usize {
    8
}

fn default_min_user_id() -> u64 {
    1
}

fn default_max_user_id() -> u64 {
    1_000_000
}

fn default_accepted_statuses() -> Vec<u16> {
    vec![200, 401]
}

fn default_max_response_time() -> Duration {
    Duration::from_millis(500)
}

fn default_log_sample_rate() -> f64 {
    0.01
}

fn default_think_time() -> Duration {
    Duration::from_secs(1)
}
