//! Thread-safe sample collection shared by every VU

use crate::summary::{CheckSummary, CounterStats, RateStats, Summary, TrendStats};
use loadtest_scenario::{CheckResult, MetricsRecorder, RequestSample};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Default)]
struct CollectorState {
    request_durations: Vec<f64>,
    failed_requests: u64,
    status_counts: BTreeMap<u16, u64>,
    errors: BTreeMap<String, u64>,
    // Insertion order is the order checks are first seen
    checks: Vec<CheckSummary>,
    iteration_durations: Vec<f64>,
    vus_max: u32,
}

/// Collects request, check and iteration samples for the whole run
#[derive(Debug, Default)]
pub struct MetricsCollector {
    state: Mutex<CollectorState>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_iteration(&self, duration: Duration) {
        self.state.lock().iteration_durations.push(as_millis(duration));
    }

    pub fn observe_vus(&self, active: u32) {
        let mut state = self.state.lock();
        state.vus_max = state.vus_max.max(active);
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().request_durations.len()
    }

    pub fn iteration_count(&self) -> usize {
        self.state.lock().iteration_durations.len()
    }

    /// Aggregate everything recorded so far over a run of `elapsed`
    pub fn summarize(&self, elapsed: Duration) -> Summary {
        let state = self.state.lock();
        let elapsed_secs = elapsed.as_secs_f64();

        let total_requests = state.request_durations.len() as u64;
        let (check_passes, check_fails) = state
            .checks
            .iter()
            .fold((0, 0), |(p, f), c| (p + c.passes, f + c.fails));

        Summary {
            duration_secs: elapsed_secs,
            vus_max: state.vus_max,
            http_req_duration: TrendStats::from_samples(state.request_durations.clone()),
            http_req_failed: RateStats::new(
                state.failed_requests,
                total_requests - state.failed_requests,
            ),
            http_reqs: CounterStats::new(total_requests, elapsed_secs),
            checks: RateStats::new(check_passes, check_fails),
            check_results: state.checks.clone(),
            iterations: CounterStats::new(state.iteration_durations.len() as u64, elapsed_secs),
            iteration_duration: TrendStats::from_samples(state.iteration_durations.clone()),
            status_counts: state.status_counts.clone(),
            errors: state.errors.clone(),
        }
    }
}

impl MetricsRecorder for MetricsCollector {
    fn record_request(&self, sample: &RequestSample) {
        let mut state = self.state.lock();
        state.request_durations.push(as_millis(sample.duration));
        if sample.failed {
            state.failed_requests += 1;
        }
        *state.status_counts.entry(sample.status).or_insert(0) += 1;
        if let Some(kind) = &sample.error {
            *state.errors.entry(kind.clone()).or_insert(0) += 1;
        }
    }

    fn record_check(&self, check: &CheckResult) {
        let mut state = self.state.lock();
        let position = match state.checks.iter().position(|c| c.name == check.name) {
            Some(position) => position,
            None => {
                state.checks.push(CheckSummary {
                    name: check.name.clone(),
                    passes: 0,
                    fails: 0,
                });
                state.checks.len() - 1
            }
        };

        let entry = &mut state.checks[position];
        if check.passed {
            entry.passes += 1;
        } else {
            entry.fails += 1;
        }
    }
}

fn as_millis(duration: Duration) -> f64 {
    duration.as_micros() as f64 / 1000.0
}
