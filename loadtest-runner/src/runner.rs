//! Ramping VU runner
//!
//! Every tick the number of running VUs is reconciled with
//! [`target_vus_at`]. New VUs are spawned as tokio tasks looping over
//! [`Scenario::iteration`]. A VU removed by a ramp-down is told to stop and
//! may finish its current iteration within `graceful_ramp_down`; once the
//! profile ends (or the shutdown future resolves) all VUs are told to stop
//! and get `graceful_stop` before they are aborted.

use crate::collector::MetricsCollector;
use crate::error::RunnerResult;
use crate::schedule::target_vus_at;
use crate::summary::Summary;
use crate::thresholds::{evaluate_thresholds, parse_thresholds, ThresholdResult};
use loadtest_config::RunnerConfig;
use loadtest_scenario::{Scenario, VuContext};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub scenario: String,
    pub summary: Summary,
    pub thresholds: Vec<ThresholdResult>,
    /// The run was stopped before the profile completed
    pub interrupted: bool,
}

impl RunReport {
    pub fn thresholds_passed(&self) -> bool {
        self.thresholds.iter().all(|t| t.passed)
    }
}

struct Vu {
    id: u64,
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

struct RetiringVu {
    vu: Vu,
    deadline: Instant,
}

/// Drives a single scenario through its load profile
pub struct Runner {
    scenario: Arc<dyn Scenario>,
    config: RunnerConfig,
    collector: Arc<MetricsCollector>,
}

impl Runner {
    pub fn new(scenario: Arc<dyn Scenario>, config: RunnerConfig) -> Self {
        Self {
            scenario,
            config,
            collector: Arc::new(MetricsCollector::new()),
        }
    }

    pub fn collector(&self) -> &Arc<MetricsCollector> {
        &self.collector
    }

    /// Run the full profile, or until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F) -> RunnerResult<RunReport>
    where
        F: Future<Output = ()>,
    {
        let options = self.scenario.options().clone();
        // Reject bad thresholds before generating any load
        parse_thresholds(&options.thresholds)?;

        let total = options.profile.total_duration();
        info!(
            "Starting scenario '{}': {} stages over {:?}, up to {} VUs",
            self.scenario.name(),
            options.profile.stages.len(),
            total,
            options.profile.peak_vus()
        );
        let stages = options.profile.stages;

        let started = Instant::now();
        let mut active: Vec<Vu> = Vec::new();
        let mut retiring: Vec<RetiringVu> = Vec::new();
        let mut next_id = 1u64;
        let mut interrupted = false;

        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => {
                    warn!("Shutdown requested, stopping virtual users");
                    interrupted = true;
                    break;
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= total {
                break;
            }

            let target = target_vus_at(&stages, elapsed) as usize;
            if active.len() < target {
                for _ in active.len()..target {
                    active.push(self.spawn_vu(next_id));
                    next_id += 1;
                }
                debug!("Scaled up to {} VUs at {:?}", active.len(), elapsed);
            } else if active.len() > target {
                let deadline = Instant::now() + self.config.graceful_ramp_down;
                for vu in active.drain(target..) {
                    let _ = vu.stop.send(true);
                    retiring.push(RetiringVu { vu, deadline });
                }
                debug!("Scaled down to {} VUs at {:?}", active.len(), elapsed);
            }
            self.collector.observe_vus(active.len() as u32);

            let now = Instant::now();
            retiring.retain(|r| {
                if r.vu.handle.is_finished() {
                    return false;
                }
                if now >= r.deadline {
                    debug!("VU {} exceeded graceful ramp-down, aborting", r.vu.id);
                    r.vu.handle.abort();
                    return false;
                }
                true
            });
        }

        self.stop_all(active, retiring).await;

        let elapsed = started.elapsed();
        let summary = self.collector.summarize(elapsed);
        let thresholds = evaluate_thresholds(&options.thresholds, &summary)?;
        info!(
            "Scenario '{}' finished after {:?}: {} iterations, {} requests",
            self.scenario.name(),
            elapsed,
            summary.iterations.count,
            summary.http_reqs.count
        );

        Ok(RunReport {
            scenario: self.scenario.name().to_string(),
            summary,
            thresholds,
            interrupted,
        })
    }

    fn spawn_vu(&self, id: u64) -> Vu {
        let (stop, mut stopped) = watch::channel(false);
        let scenario = self.scenario.clone();
        let collector = self.collector.clone();
        let mut context = VuContext::new(id, self.config.seed, collector.clone());

        let handle = tokio::spawn(async move {
            while !*stopped.borrow_and_update() {
                context.iteration += 1;
                let started = Instant::now();
                scenario.iteration(&mut context).await;
                collector.record_iteration(started.elapsed());
            }
        });

        Vu { id, stop, handle }
    }

    async fn stop_all(&self, active: Vec<Vu>, retiring: Vec<RetiringVu>) {
        let deadline = Instant::now() + self.config.graceful_stop;
        let vus: Vec<(Vu, Instant)> = active
            .into_iter()
            .map(|vu| (vu, deadline))
            .chain(retiring.into_iter().map(|r| (r.vu, r.deadline.min(deadline))))
            .collect();

        for (vu, _) in &vus {
            let _ = vu.stop.send(true);
        }

        for (vu, deadline) in vus {
            let mut handle = vu.handle;
            if tokio::time::timeout_at(deadline, &mut handle).await.is_err() {
                debug!("VU {} exceeded graceful stop, aborting", vu.id);
                handle.abort();
            }
        }
    }
}
