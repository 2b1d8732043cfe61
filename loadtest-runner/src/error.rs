//! Runner error types

use loadtest_config::ThresholdParseError;
use thiserror::Error;

/// Errors that abort a run or its reporting
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Invalid threshold on '{metric}': {source}")]
    InvalidThreshold {
        metric: String,
        #[source]
        source: ThresholdParseError,
    },

    #[error("Threshold '{expr}' on '{metric}' uses an aggregate the metric does not support")]
    UnsupportedAggregate { metric: String, expr: String },

    #[error("Unknown metric in threshold: {0}")]
    UnknownMetric(String),

    #[error("Failed to write summary: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize summary: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RunnerResult<T> = Result<T, RunnerError>;
