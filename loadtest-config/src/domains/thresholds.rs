//! Threshold configuration
//!
//! Thresholds map a metric name to one or more predicate strings such as
//! `p(95)<500` or `rate<0.1`. The predicates are parsed here so that a bad
//! expression is rejected when the configuration is loaded; evaluating them
//! against collected metrics is the runner's job.

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Request duration trend, in milliseconds
pub const HTTP_REQ_DURATION: &str = "http_req_duration";
/// Fraction of requests that failed
pub const HTTP_REQ_FAILED: &str = "http_req_failed";
/// Total number of requests
pub const HTTP_REQS: &str = "http_reqs";
/// Fraction of passing checks
pub const CHECKS: &str = "checks";
/// Total number of completed iterations
pub const ITERATIONS: &str = "iterations";
/// Iteration duration trend, in milliseconds
pub const ITERATION_DURATION: &str = "iteration_duration";

/// Shape of a built-in metric, which decides the aggregates it supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Trend,
    Rate,
    Counter,
}

impl MetricKind {
    /// Kind of a built-in metric, `None` for unknown names
    pub fn for_metric(name: &str) -> Option<Self> {
        match name {
            HTTP_REQ_DURATION | ITERATION_DURATION => Some(MetricKind::Trend),
            HTTP_REQ_FAILED | CHECKS => Some(MetricKind::Rate),
            HTTP_REQS | ITERATIONS => Some(MetricKind::Counter),
            _ => None,
        }
    }
}

/// Aggregation applied to a metric before comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    Avg,
    Min,
    Max,
    Med,
    Percentile(f64),
    Rate,
    Count,
}

impl Aggregate {
    pub fn applies_to(&self, kind: MetricKind) -> bool {
        match self {
            Aggregate::Avg
            | Aggregate::Min
            | Aggregate::Max
            | Aggregate::Med
            | Aggregate::Percentile(_) => kind == MetricKind::Trend,
            Aggregate::Rate => matches!(kind, MetricKind::Rate | MetricKind::Counter),
            Aggregate::Count => matches!(kind, MetricKind::Counter),
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Avg => write!(f, "avg"),
            Aggregate::Min => write!(f, "min"),
            Aggregate::Max => write!(f, "max"),
            Aggregate::Med => write!(f, "med"),
            Aggregate::Percentile(p) => write!(f, "p({})", p),
            Aggregate::Rate => write!(f, "rate"),
            Aggregate::Count => write!(f, "count"),
        }
    }
}

impl FromStr for Aggregate {
    type Err = ThresholdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(Aggregate::Avg),
            "min" => Ok(Aggregate::Min),
            "max" => Ok(Aggregate::Max),
            "med" => Ok(Aggregate::Med),
            "rate" => Ok(Aggregate::Rate),
            "count" => Ok(Aggregate::Count),
            _ => {
                let inner = s
                    .strip_prefix("p(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| ThresholdParseError::UnknownAggregate(s.to_string()))?;
                let percentile: f64 = inner
                    .trim()
                    .parse()
                    .map_err(|_| ThresholdParseError::InvalidPercentile(s.to_string()))?;
                if !(0.0..=100.0).contains(&percentile) {
                    return Err(ThresholdParseError::InvalidPercentile(s.to_string()));
                }
                Ok(Aggregate::Percentile(percentile))
            }
        }
    }
}

/// Comparison operator of a threshold predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    // Two-character operators first so `<=` is not read as `<`.
    const SYMBOLS: [(&'static str, Comparison); 6] = [
        ("<=", Comparison::Le),
        (">=", Comparison::Ge),
        ("==", Comparison::Eq),
        ("!=", Comparison::Ne),
        ("<", Comparison::Lt),
        (">", Comparison::Gt),
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        }
    }

    pub fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }
}

/// A parsed predicate such as `p(95)<500`
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdExpr {
    pub aggregate: Aggregate,
    pub comparison: Comparison,
    pub bound: f64,
}

impl ThresholdExpr {
    pub fn is_satisfied_by(&self, value: f64) -> bool {
        self.comparison.holds(value, self.bound)
    }
}

impl fmt::Display for ThresholdExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.aggregate, self.comparison.symbol(), self.bound)
    }
}

impl FromStr for ThresholdExpr {
    type Err = ThresholdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        let (position, symbol, comparison) = Comparison::SYMBOLS
            .iter()
            .filter_map(|(symbol, comparison)| {
                compact.find(symbol).map(|pos| (pos, *symbol, *comparison))
            })
            .min_by_key(|(pos, symbol, _)| (*pos, std::cmp::Reverse(symbol.len())))
            .ok_or_else(|| ThresholdParseError::MissingOperator(s.to_string()))?;

        let aggregate: Aggregate = compact[..position].parse()?;
        let bound_str = &compact[position + symbol.len()..];
        let bound: f64 = bound_str
            .parse()
            .map_err(|_| ThresholdParseError::InvalidBound(s.to_string()))?;

        Ok(Self {
            aggregate,
            comparison,
            bound,
        })
    }
}

/// Errors that can occur when parsing threshold predicates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdParseError {
    #[error("Threshold '{0}' has no comparison operator")]
    MissingOperator(String),

    #[error("Unknown aggregate '{0}'. Supported: avg, min, max, med, p(N), rate, count")]
    UnknownAggregate(String),

    #[error("Invalid percentile in '{0}'")]
    InvalidPercentile(String),

    #[error("Invalid numeric bound in '{0}'")]
    InvalidBound(String),
}

/// Metric name to predicate strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdSet(BTreeMap<String, Vec<String>>);

impl Default for ThresholdSet {
    fn default() -> Self {
        let mut thresholds = BTreeMap::new();
        thresholds.insert(HTTP_REQ_DURATION.to_string(), vec!["p(95)<500".to_string()]);
        thresholds.insert(HTTP_REQ_FAILED.to_string(), vec!["rate<0.1".to_string()]);
        Self(thresholds)
    }
}

impl ThresholdSet {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, metric: impl Into<String>, predicate: impl Into<String>) -> Self {
        self.0.entry(metric.into()).or_default().push(predicate.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw predicate strings by metric
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(metric, exprs)| exprs.iter().map(move |e| (metric.as_str(), e.as_str())))
    }
}

impl Validatable for ThresholdSet {
    fn validate(&self) -> ConfigResult<()> {
        for (metric, source) in self.iter() {
            let kind = MetricKind::for_metric(metric)
                .ok_or_else(|| self.validation_error(format!("unknown metric '{}'", metric)))?;

            let expr: ThresholdExpr = source
                .parse()
                .map_err(|e: ThresholdParseError| self.validation_error(e.to_string()))?;

            if !expr.aggregate.applies_to(kind) {
                return Err(self.validation_error(format!(
                    "aggregate '{}' cannot be used with metric '{}'",
                    expr.aggregate, metric
                )));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "thresholds"
    }
}
