//! Logging setup for the login load test
//!
//! Everything in the workspace logs through `tracing`; this crate installs
//! the global subscriber according to `LoggingConfig`.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing, CONSOLE_TARGET};
pub use loadtest_config::{LogFormat, LogLevel, LoggingConfig};
