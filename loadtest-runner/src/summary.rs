//! Aggregated end-of-run metrics

use loadtest_config::domains::thresholds::{
    CHECKS, HTTP_REQS, HTTP_REQ_DURATION, HTTP_REQ_FAILED, ITERATIONS, ITERATION_DURATION,
};
use loadtest_config::Aggregate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distribution of a timing metric, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    pub count: u64,
    pub avg: f64,
    pub min: f64,
    pub med: f64,
    pub max: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    /// Sorted samples, kept for arbitrary percentiles
    #[serde(skip)]
    sorted: Vec<f64>,
}

impl TrendStats {
    pub fn from_samples(mut samples: Vec<f64>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        samples.sort_unstable_by(|a, b| a.total_cmp(b));
        let count = samples.len();
        let avg = samples.iter().sum::<f64>() / count as f64;

        Self {
            count: count as u64,
            avg,
            min: samples[0],
            med: percentile(&samples, 50.0),
            max: samples[count - 1],
            p90: percentile(&samples, 90.0),
            p95: percentile(&samples, 95.0),
            p99: percentile(&samples, 99.0),
            sorted: samples,
        }
    }

    pub fn percentile(&self, p: f64) -> f64 {
        percentile(&self.sorted, p)
    }
}

// Nearest rank over an ascending slice, 0 when empty
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Fraction of non-zero samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateStats {
    pub passes: u64,
    pub fails: u64,
    pub rate: f64,
}

impl RateStats {
    pub fn new(passes: u64, fails: u64) -> Self {
        let total = passes + fails;
        let rate = if total == 0 {
            0.0
        } else {
            passes as f64 / total as f64
        };
        Self { passes, fails, rate }
    }

    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }
}

/// Monotonic count and its per-second rate over the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterStats {
    pub count: u64,
    pub rate: f64,
}

impl CounterStats {
    pub fn new(count: u64, elapsed_secs: f64) -> Self {
        let rate = if elapsed_secs > 0.0 {
            count as f64 / elapsed_secs
        } else {
            0.0
        };
        Self { count, rate }
    }
}

/// Results of one named check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

/// Everything collected during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub duration_secs: f64,
    pub vus_max: u32,
    pub http_req_duration: TrendStats,
    /// `passes` counts failed requests, matching the metric's name
    pub http_req_failed: RateStats,
    pub http_reqs: CounterStats,
    pub checks: RateStats,
    pub check_results: Vec<CheckSummary>,
    pub iterations: CounterStats,
    pub iteration_duration: TrendStats,
    pub status_counts: BTreeMap<u16, u64>,
    pub errors: BTreeMap<String, u64>,
}

impl Summary {
    /// Value of `aggregate` over a built-in metric, `None` when the pair is
    /// not meaningful
    pub fn metric_value(&self, metric: &str, aggregate: Aggregate) -> Option<f64> {
        match metric {
            HTTP_REQ_DURATION => trend_value(&self.http_req_duration, aggregate),
            ITERATION_DURATION => trend_value(&self.iteration_duration, aggregate),
            HTTP_REQ_FAILED => rate_value(&self.http_req_failed, aggregate),
            CHECKS => rate_value(&self.checks, aggregate),
            HTTP_REQS => counter_value(&self.http_reqs, aggregate),
            ITERATIONS => counter_value(&self.iterations, aggregate),
            _ => None,
        }
    }
}

fn trend_value(trend: &TrendStats, aggregate: Aggregate) -> Option<f64> {
    match aggregate {
        Aggregate::Avg => Some(trend.avg),
        Aggregate::Min => Some(trend.min),
        Aggregate::Max => Some(trend.max),
        Aggregate::Med => Some(trend.med),
        Aggregate::Percentile(p) => Some(trend.percentile(p)),
        Aggregate::Rate | Aggregate::Count => None,
    }
}

fn rate_value(rate: &RateStats, aggregate: Aggregate) -> Option<f64> {
    match aggregate {
        Aggregate::Rate => Some(rate.rate),
        _ => None,
    }
}

fn counter_value(counter: &CounterStats, aggregate: Aggregate) -> Option<f64> {
    match aggregate {
        Aggregate::Count => Some(counter.count as f64),
        Aggregate::Rate => Some(counter.rate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_stats() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        let trend = TrendStats::from_samples(samples.into_iter().rev().collect());

        assert_eq!(trend.count, 100);
        assert_eq!(trend.min, 1.0);
        assert_eq!(trend.max, 100.0);
        assert_eq!(trend.avg, 50.5);
        assert_eq!(trend.med, 51.0);
        assert_eq!(trend.p90, 91.0);
        assert_eq!(trend.p95, 96.0);
        assert_eq!(trend.p99, 100.0);
        assert_eq!(trend.percentile(100.0), 100.0);
        assert_eq!(trend.percentile(0.0), 1.0);
    }

    #[test]
    fn test_empty_trend() {
        let trend = TrendStats::from_samples(Vec::new());
        assert_eq!(trend.count, 0);
        assert_eq!(trend.percentile(95.0), 0.0);
    }

    #[test]
    fn test_rate_and_counter() {
        let rate = RateStats::new(1, 3);
        assert_eq!(rate.rate, 0.25);
        assert_eq!(rate.total(), 4);
        assert_eq!(RateStats::new(0, 0).rate, 0.0);

        let counter = CounterStats::new(120, 60.0);
        assert_eq!(counter.rate, 2.0);
        assert_eq!(CounterStats::new(5, 0.0).rate, 0.0);
    }

    #[test]
    fn test_metric_value_lookup() {
        let summary = Summary {
            http_req_duration: TrendStats::from_samples(vec![100.0, 200.0, 300.0, 400.0]),
            http_req_failed: RateStats::new(1, 9),
            http_reqs: CounterStats::new(10, 5.0),
            ..Default::default()
        };

        assert_eq!(summary.metric_value(HTTP_REQ_DURATION, Aggregate::Avg), Some(250.0));
        assert_eq!(
            summary.metric_value(HTTP_REQ_DURATION, Aggregate::Percentile(95.0)),
            Some(400.0)
        );
        assert_eq!(summary.metric_value(HTTP_REQ_FAILED, Aggregate::Rate), Some(0.1));
        assert_eq!(summary.metric_value(HTTP_REQS, Aggregate::Count), Some(10.0));
        assert_eq!(summary.metric_value(HTTP_REQS, Aggregate::Rate), Some(2.0));
        assert_eq!(summary.metric_value(HTTP_REQ_FAILED, Aggregate::Avg), None);
        assert_eq!(summary.metric_value("vus", Aggregate::Count), None);
    }
}
