//! End-of-run report rendering and export

use crate::error::RunnerResult;
use crate::runner::RunReport;
use crate::summary::{Summary, TrendStats};
use crate::thresholds::ThresholdResult;
use chrono::{DateTime, Utc};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

const LABEL_WIDTH: usize = 32;

/// JSON document written by `--summary-export`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryExport {
    pub timestamp: DateTime<Utc>,
    pub scenario: String,
    pub interrupted: bool,
    pub thresholds_passed: bool,
    pub summary: Summary,
    pub thresholds: Vec<ThresholdResult>,
}

impl From<&RunReport> for SummaryExport {
    fn from(report: &RunReport) -> Self {
        Self {
            timestamp: Utc::now(),
            scenario: report.scenario.clone(),
            interrupted: report.interrupted,
            thresholds_passed: report.thresholds_passed(),
            summary: report.summary.clone(),
            thresholds: report.thresholds.clone(),
        }
    }
}

pub fn write_summary_export(path: &Path, report: &RunReport) -> RunnerResult<()> {
    let export = SummaryExport::from(report);
    let json = serde_json::to_string_pretty(&export)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!("Summary exported to {}", path.display());
    Ok(())
}

/// Human readable summary, one metric per line
pub fn render_summary(report: &RunReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "\n  {} {}", "scenario:".bold(), report.scenario);
    if report.interrupted {
        let _ = writeln!(out, "  {}", "run interrupted before the profile completed".yellow());
    }
    out.push('\n');

    for check in &summary.check_results {
        let total = check.passes + check.fails;
        if check.fails == 0 {
            let _ = writeln!(out, "  {} {}", "✓".green(), check.name);
        } else {
            let _ = writeln!(out, "  {} {}", "✗".red(), check.name);
            let _ = writeln!(
                out,
                "   ↳  {:.0}% : ✓ {} / ✗ {}",
                percent(check.passes, total),
                check.passes,
                check.fails
            );
        }
    }
    if !summary.check_results.is_empty() {
        out.push('\n');
    }

    let failing: Vec<&str> = report
        .thresholds
        .iter()
        .filter(|t| !t.passed)
        .map(|t| t.metric.as_str())
        .collect();
    let mut line = |name: &str, value: String| {
        let marker = if failing.iter().any(|m| *m == name) {
            "✗".red()
        } else if report.thresholds.iter().any(|t| t.metric == name) {
            "✓".green()
        } else {
            " ".normal()
        };
        let dots = ".".repeat(LABEL_WIDTH.saturating_sub(name.len()));
        let _ = writeln!(out, "  {} {}{}: {}", marker, name, dots.dimmed(), value);
    };

    line(
        "checks",
        format!(
            "{:.2}% ✓ {} ✗ {}",
            summary.checks.rate * 100.0,
            summary.checks.passes,
            summary.checks.fails
        ),
    );
    line("http_req_duration", trend_line(&summary.http_req_duration));
    line(
        "http_req_failed",
        format!(
            "{:.2}% ✓ {} ✗ {}",
            summary.http_req_failed.rate * 100.0,
            summary.http_req_failed.passes,
            summary.http_req_failed.fails
        ),
    );
    line(
        "http_reqs",
        format!("{} {:.2}/s", summary.http_reqs.count, summary.http_reqs.rate),
    );
    line("iteration_duration", trend_line(&summary.iteration_duration));
    line(
        "iterations",
        format!("{} {:.2}/s", summary.iterations.count, summary.iterations.rate),
    );
    line("vus_max", summary.vus_max.to_string());

    if !summary.errors.is_empty() {
        let _ = writeln!(out, "\n  {}", "transport errors:".bold());
        for (kind, count) in &summary.errors {
            let _ = writeln!(out, "    {}: {}", kind, count);
        }
    }

    if !report.thresholds.is_empty() {
        let _ = writeln!(out, "\n  {}", "thresholds:".bold());
        for threshold in &report.thresholds {
            let marker = if threshold.passed {
                "✓".green()
            } else {
                "✗".red()
            };
            let _ = writeln!(
                out,
                "  {} {} {} (observed {:.4})",
                marker, threshold.metric, threshold.source, threshold.value
            );
        }
    }

    out
}

fn trend_line(trend: &TrendStats) -> String {
    format!(
        "avg={} min={} med={} max={} p(90)={} p(95)={}",
        millis(trend.avg),
        millis(trend.min),
        millis(trend.med),
        millis(trend.max),
        millis(trend.p90),
        millis(trend.p95)
    )
}

fn millis(value: f64) -> String {
    if value >= 1000.0 {
        format!("{:.2}s", value / 1000.0)
    } else {
        format!("{:.2}ms", value)
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{CheckSummary, CounterStats, RateStats};

    fn report() -> RunReport {
        RunReport {
            scenario: "login".to_string(),
            summary: Summary {
                duration_secs: 10.0,
                vus_max: 5,
                http_req_duration: TrendStats::from_samples(vec![20.0, 40.0, 1500.0]),
                http_req_failed: RateStats::new(1, 2),
                http_reqs: CounterStats::new(3, 10.0),
                checks: RateStats::new(5, 1),
                check_results: vec![
                    CheckSummary {
                        name: "status is 200 or 401".to_string(),
                        passes: 3,
                        fails: 0,
                    },
                    CheckSummary {
                        name: "response time < 500ms".to_string(),
                        passes: 2,
                        fails: 1,
                    },
                ],
                iterations: CounterStats::new(3, 10.0),
                ..Default::default()
            },
            thresholds: vec![
                ThresholdResult {
                    metric: "http_req_duration".to_string(),
                    source: "p(95)<500".to_string(),
                    value: 1500.0,
                    passed: false,
                },
                ThresholdResult {
                    metric: "http_req_failed".to_string(),
                    source: "rate<0.1".to_string(),
                    value: 1.0 / 3.0,
                    passed: false,
                },
            ],
            interrupted: false,
        }
    }

    #[test]
    fn test_render_summary() {
        colored::control::set_override(false);
        let rendered = render_summary(&report());

        assert!(rendered.contains("✓ status is 200 or 401"));
        assert!(rendered.contains("✗ response time < 500ms"));
        assert!(rendered.contains("↳  67% : ✓ 2 / ✗ 1"));
        assert!(rendered.contains("max=1.50s"));
        assert!(rendered.contains("http_reqs"));
        assert!(rendered.contains("3 0.30/s"));
        assert!(rendered.contains("✗ http_req_duration p(95)<500"));
        assert!(!rendered.contains("interrupted"));
    }

    #[test]
    fn test_summary_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.json");

        write_summary_export(&path, &report()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let export: SummaryExport = serde_json::from_str(&raw).unwrap();
        assert_eq!(export.scenario, "login");
        assert!(!export.thresholds_passed);
        assert_eq!(export.thresholds.len(), 2);
        assert_eq!(export.summary.http_reqs.count, 3);
        assert_eq!(export.summary.check_results[1].fails, 1);
    }
}
