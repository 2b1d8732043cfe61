//! Load profile configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One linear ramp segment: reach `target` VUs by the end of `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Length of the ramp
    #[serde(with = "humantime_serde")]
    pub duration: Duration,

    /// VU count at the end of the ramp
    pub target: u32,
}

impl Stage {
    pub fn new(duration: Duration, target: u32) -> Self {
        Self { duration, target }
    }
}

/// Ordered ramp stages, starting from zero VUs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadProfile {
    #[serde(default = "default_stages")]
    pub stages: Vec<Stage>,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            stages: default_stages(),
        }
    }
}

impl LoadProfile {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Sum of all stage durations
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Highest VU target across all stages
    pub fn peak_vus(&self) -> u32 {
        self.stages.iter().map(|s| s.target).max().unwrap_or(0)
    }
}

impl Validatable for LoadProfile {
    fn validate(&self) -> ConfigResult<()> {
        if self.stages.is_empty() {
            return Err(self.validation_error("at least one stage is required"));
        }

        for (index, stage) in self.stages.iter().enumerate() {
            if stage.duration.is_zero() {
                return Err(self.validation_error(format!(
                    "stage {} duration must be greater than 0",
                    index
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "profile"
    }
}

fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new(Duration::from_secs(60), 50),
        Stage::new(Duration::from_secs(60), 100),
        Stage::new(Duration::from_secs(60), 0),
    ]
}
