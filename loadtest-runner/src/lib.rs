//! Minimal harness for running a [`Scenario`](loadtest_scenario::Scenario)
//!
//! The runner ramps virtual users linearly through the scenario's load
//! profile, feeds every sample into a [`MetricsCollector`] and evaluates the
//! scenario's thresholds once the profile has finished or the run was
//! interrupted.

pub mod collector;
pub mod error;
pub mod report;
pub mod runner;
pub mod schedule;
pub mod summary;
pub mod thresholds;

pub use collector::MetricsCollector;
pub use error::{RunnerError, RunnerResult};
pub use report::{render_summary, write_summary_export, SummaryExport};
pub use runner::{RunReport, Runner};
pub use schedule::target_vus_at;
pub use summary::{CheckSummary, CounterStats, RateStats, Summary, TrendStats};
pub use thresholds::{evaluate_thresholds, parse_thresholds, ThresholdResult};
