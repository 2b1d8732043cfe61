//! End-to-end tests of single login iterations against a live endpoint

mod support;

use loadtest_config::LoadTestConfig;
use loadtest_http::HttpManager;
use loadtest_runner::MetricsCollector;
use loadtest_scenario::{LoginScenario, VuContext};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use support::{closed_login_url, start_login_server};

fn scenario_for(url: &str) -> LoginScenario {
    let mut config = LoadTestConfig::default();
    config.target.url = url.to_string();
    let client = HttpManager::with_config(config.http.clone().into()).unwrap();
    LoginScenario::new(&config, Arc::new(client)).unwrap()
}

#[tokio::test]
async fn test_successful_login_iteration() {
    let (url, server) = start_login_server(200, Duration::from_millis(50)).await.unwrap();
    let scenario = scenario_for(&url);
    let collector = Arc::new(MetricsCollector::new());
    let mut vu = VuContext::new(1, Some(7), collector.clone());

    let started = Instant::now();
    let outcome = scenario.run_once(&mut vu).await;
    let elapsed = started.elapsed();

    // The server waited 50ms, then the iteration paused for a full second
    assert!(elapsed >= Duration::from_millis(1050), "iteration took {:?}", elapsed);
    assert!(outcome.sample.duration >= Duration::from_millis(50));

    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].content_type.as_deref(), Some("application/json"));

    let body: Value = serde_json::from_str(&received[0].body).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["password"], "testpassword123");

    let username = object["username"].as_str().unwrap();
    assert_eq!(username, outcome.username);
    let digits = username.strip_suffix("@katakode.com").unwrap();
    assert_eq!(digits.len(), 8);
    let id: u64 = digits.parse().unwrap();
    assert!((1..=1_000_000).contains(&id));

    assert_eq!(outcome.sample.status, 200);
    assert!(!outcome.sample.failed);
    assert!(outcome.checks.iter().all(|c| c.passed));

    let summary = collector.summarize(elapsed);
    assert_eq!(summary.http_reqs.count, 1);
    assert_eq!(summary.checks.passes, 2);
}

#[tokio::test]
async fn test_unauthorized_passes_status_check() {
    let (url, _server) = start_login_server(401, Duration::ZERO).await.unwrap();
    let scenario = scenario_for(&url);
    let collector = Arc::new(MetricsCollector::new());
    let mut vu = VuContext::new(1, None, collector.clone());

    let outcome = scenario.run_once(&mut vu).await;

    assert_eq!(outcome.sample.status, 401);
    assert!(outcome.checks[0].passed);
    // 401 is outside the default expected statuses
    assert!(outcome.sample.failed);
}

#[tokio::test]
async fn test_server_error_iteration_completes() {
    let (url, _server) = start_login_server(500, Duration::from_millis(10)).await.unwrap();
    let scenario = scenario_for(&url);
    let collector = Arc::new(MetricsCollector::new());
    let mut vu = VuContext::new(1, None, collector.clone());

    let started = Instant::now();
    let outcome = scenario.run_once(&mut vu).await;

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(outcome.sample.status, 500);
    assert_eq!(outcome.checks[0].name, "status is 200 or 401");
    assert!(!outcome.checks[0].passed);
    assert_eq!(outcome.checks[1].name, "response time < 500ms");
    assert!(outcome.checks[1].passed);

    let summary = collector.summarize(started.elapsed());
    assert_eq!(summary.status_counts.get(&500), Some(&1));
    assert_eq!(summary.check_results[0].fails, 1);
    assert_eq!(summary.check_results[1].passes, 1);
}

#[tokio::test]
async fn test_connection_refused_is_recorded_not_raised() {
    let url = closed_login_url().await.unwrap();
    let scenario = scenario_for(&url);
    let collector = Arc::new(MetricsCollector::new());
    let mut vu = VuContext::new(1, None, collector.clone());

    let outcome = scenario.run_once(&mut vu).await;

    assert_eq!(outcome.sample.status, 0);
    assert!(outcome.sample.failed);
    assert!(outcome.sample.error.is_some());
    assert!(!outcome.checks[0].passed);

    let summary = collector.summarize(Duration::from_secs(1));
    assert_eq!(summary.http_req_failed.rate, 1.0);
    assert_eq!(summary.errors.values().sum::<u64>(), 1);
}
