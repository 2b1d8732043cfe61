//! Threshold evaluation over a run summary

use crate::error::{RunnerError, RunnerResult};
use crate::summary::Summary;
use loadtest_config::{MetricKind, ThresholdExpr, ThresholdSet};
use serde::{Deserialize, Serialize};

/// Outcome of one threshold predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub metric: String,
    /// Predicate as written in the configuration
    pub source: String,
    /// Observed aggregate value
    pub value: f64,
    pub passed: bool,
}

/// Parse every predicate of `set`, rejecting unknown metrics and aggregates
/// a metric does not support
pub fn parse_thresholds(set: &ThresholdSet) -> RunnerResult<Vec<(String, String, ThresholdExpr)>> {
    set.iter()
        .map(|(metric, source)| {
            let kind = MetricKind::for_metric(metric)
                .ok_or_else(|| RunnerError::UnknownMetric(metric.to_string()))?;
            let expr: ThresholdExpr = source.parse().map_err(|e| RunnerError::InvalidThreshold {
                metric: metric.to_string(),
                source: e,
            })?;
            if !expr.aggregate.applies_to(kind) {
                return Err(RunnerError::UnsupportedAggregate {
                    metric: metric.to_string(),
                    expr: source.to_string(),
                });
            }
            Ok((metric.to_string(), source.to_string(), expr))
        })
        .collect()
}

/// Evaluate `set` against `summary`, in metric name order
pub fn evaluate_thresholds(set: &ThresholdSet, summary: &Summary) -> RunnerResult<Vec<ThresholdResult>> {
    let parsed = parse_thresholds(set)?;

    parsed
        .into_iter()
        .map(|(metric, source, expr)| {
            let value = summary
                .metric_value(&metric, expr.aggregate)
                .ok_or_else(|| RunnerError::UnsupportedAggregate {
                    metric: metric.clone(),
                    expr: source.clone(),
                })?;
            Ok(ThresholdResult {
                passed: expr.is_satisfied_by(value),
                metric,
                source,
                value,
            })
        })
        .collect()
}
