//! The seam between a scenario and the runner that drives it

use crate::metrics::MetricsRecorder;
use loadtest_config::{LoadProfile, LoadTestConfig, ThresholdSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Load shape and pass/fail gates, read once before the run starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOptions {
    pub profile: LoadProfile,
    pub thresholds: ThresholdSet,
}

impl From<&LoadTestConfig> for ScenarioOptions {
    fn from(config: &LoadTestConfig) -> Self {
        Self {
            profile: config.profile.clone(),
            thresholds: config.thresholds.clone(),
        }
    }
}

/// Per virtual user state handed to every iteration it runs
pub struct VuContext {
    /// 1-based id of the virtual user
    pub vu_id: u64,
    /// Number of iterations this VU has started, including the current one
    pub iteration: u64,
    pub rng: StdRng,
    pub recorder: Arc<dyn MetricsRecorder>,
}

impl VuContext {
    /// Seeded contexts give every VU its own reproducible stream
    pub fn new(vu_id: u64, seed: Option<u64>, recorder: Arc<dyn MetricsRecorder>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(vu_id)),
            None => StdRng::from_os_rng(),
        };

        Self {
            vu_id,
            iteration: 0,
            rng,
            recorder,
        }
    }
}

/// A unit of load the runner invokes repeatedly and concurrently
#[async_trait::async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;

    fn options(&self) -> &ScenarioOptions;

    /// Run one iteration. Must not fail: every problem is reported through
    /// `vu.recorder`.
    async fn iteration(&self, vu: &mut VuContext);
}
