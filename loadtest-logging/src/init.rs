use anyhow::Result;
use loadtest_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Target of the operator-facing lines emitted by iterations
pub const CONSOLE_TARGET: &str = "loadtest::console";

/// Build the filter for a set of directives, falling back to `RUST_LOG` and then `info`.
/// Lines under [`CONSOLE_TARGET`] stay enabled at `info` whatever the level.
pub fn build_env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(with_console_directive(directives))
        .or_else(|_| {
            let from_env = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
            EnvFilter::try_new(with_console_directive(&from_env))
        })
        .unwrap_or_else(|_| EnvFilter::new(with_console_directive("info")))
}

fn with_console_directive(directives: &str) -> String {
    let directives = directives.trim().trim_end_matches(',');
    if directives.is_empty() {
        format!("{}=info", CONSOLE_TARGET)
    } else {
        format!("{},{}=info", directives, CONSOLE_TARGET)
    }
}

/// Initialize logging from configuration
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(&config.filter_directives());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.ansi)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    // Use try_init to avoid panic if global subscriber already set
    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = build_env_filter(log_level);

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}
