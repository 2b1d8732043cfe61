//! Domain-driven configuration for the login load test
//!
//! The configuration is split by concern (load profile, thresholds, target,
//! HTTP client, logging, runner) with validation, defaults that reproduce the
//! stock login scenario, and environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    http::HttpConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    profile::{LoadProfile, Stage},
    runner::RunnerConfig,
    target::TargetConfig,
    thresholds::{Aggregate, Comparison, MetricKind, ThresholdExpr, ThresholdParseError, ThresholdSet},
    LoadTestConfig,
};
