//! The login scenario

use crate::checks::{CheckResult, Checks};
use crate::metrics::RequestSample;
use crate::request::LoginRequest;
use crate::sampler::DiagnosticSampler;
use crate::scenario::{Scenario, ScenarioOptions, VuContext};
use crate::username::UsernameGenerator;
use loadtest_config::validation::Validatable;
use loadtest_config::{ConfigResult, LoadTestConfig};
use loadtest_http::{HttpClient, HttpRequest};
use loadtest_logging::CONSOLE_TARGET;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// What a single login iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationOutcome {
    pub username: String,
    pub sample: RequestSample,
    pub checks: [CheckResult; 2],
    pub logged: bool,
}

/// POSTs a random user's credentials to the login endpoint, checks the
/// response and pauses
pub struct LoginScenario {
    options: ScenarioOptions,
    url: String,
    password: String,
    usernames: UsernameGenerator,
    sampler: DiagnosticSampler,
    checks: Checks,
    think_time: Duration,
    client: Arc<dyn HttpClient>,
}

impl LoginScenario {
    /// Build the scenario, rejecting a target the username generator or
    /// checks cannot work with
    pub fn new(config: &LoadTestConfig, client: Arc<dyn HttpClient>) -> ConfigResult<Self> {
        config.target.validate()?;
        Ok(Self {
            options: ScenarioOptions::from(config),
            url: config.target.url.clone(),
            password: config.target.password.clone(),
            usernames: UsernameGenerator::from(&config.target),
            sampler: DiagnosticSampler::new(config.target.log_sample_rate),
            checks: Checks::from(&config.target),
            think_time: config.target.think_time,
            client,
        })
    }

    pub fn checks(&self) -> &Checks {
        &self.checks
    }

    /// One iteration, returning what was sent and observed
    pub async fn run_once(&self, vu: &mut VuContext) -> IterationOutcome {
        let username = self.usernames.generate(&mut vu.rng);
        let login = LoginRequest::new(username, self.password.as_str());
        let request = HttpRequest::post_json(self.url.as_str(), login.to_json());

        let started = Instant::now();
        let sample = match self.client.send(&request).await {
            Ok(response) => RequestSample::from_response(&response),
            Err(e) => {
                debug!(vu = vu.vu_id, "Login request failed: {}", e);
                RequestSample::from_error(&e, started.elapsed())
            }
        };
        vu.recorder.record_request(&sample);

        let logged = self.sampler.should_log(&mut vu.rng);
        if logged {
            info!(
                target: CONSOLE_TARGET,
                "Testing username: {}, Status: {}", login.username, sample.status
            );
        }

        let checks = self.checks.evaluate(&sample);
        for check in &checks {
            vu.recorder.record_check(check);
        }

        tokio::time::sleep(self.think_time).await;

        IterationOutcome {
            username: login.username,
            sample,
            checks,
            logged,
        }
    }
}

#[async_trait::async_trait]
impl Scenario for LoginScenario {
    fn name(&self) -> &str {
        "login"
    }

    fn options(&self) -> &ScenarioOptions {
        &self.options
    }

    async fn iteration(&self, vu: &mut VuContext) {
        self.run_once(vu).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsRecorder;
    use loadtest_http::{HttpError, HttpResponse};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CollectingRecorder {
        requests: Mutex<Vec<RequestSample>>,
        checks: Mutex<Vec<CheckResult>>,
    }

    impl MetricsRecorder for CollectingRecorder {
        fn record_request(&self, sample: &RequestSample) {
            self.requests.lock().push(sample.clone());
        }

        fn record_check(&self, check: &CheckResult) {
            self.checks.lock().push(check.clone());
        }
    }

    /// Answers every request with a fixed status after a fixed delay
    struct StubClient {
        status: Option<u16>,
        delay: Duration,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl StubClient {
        fn answering(status: u16, delay: Duration) -> Self {
            Self {
                status: Some(status),
                delay,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                status: None,
                delay: Duration::ZERO,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl HttpClient for StubClient {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
            self.sent.lock().push(request.clone());
            tokio::time::sleep(self.delay).await;
            match self.status {
                Some(status) => Ok(HttpResponse {
                    status,
                    duration: self.delay,
                    body_len: 0,
                }),
                None => Err(HttpError::NoMockResponse(request.mock_key())),
            }
        }
    }

    type Fixture = (LoginScenario, Arc<StubClient>, Arc<CollectingRecorder>, VuContext);

    fn setup(client: StubClient) -> Fixture {
        let client = Arc::new(client);
        let recorder = Arc::new(CollectingRecorder::default());
        let scenario = LoginScenario::new(&LoadTestConfig::default(), client.clone()).unwrap();
        let vu = VuContext::new(1, Some(99), recorder.clone());
        (scenario, client, recorder, vu)
    }

    /// Collects formatted log output for the current thread
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    fn scenario_with_log_rate(rate: f64, client: StubClient) -> (LoginScenario, VuContext) {
        let mut config = LoadTestConfig::default();
        config.target.log_sample_rate = rate;
        let recorder = Arc::new(CollectingRecorder::default());
        let scenario = LoginScenario::new(&config, Arc::new(client)).unwrap();
        (scenario, VuContext::new(1, Some(5), recorder))
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_login_iteration() {
        let (scenario, client, recorder, mut vu) =
            setup(StubClient::answering(200, Duration::from_millis(50)));

        let started = Instant::now();
        let outcome = scenario.run_once(&mut vu).await;

        // 50ms response plus the one second pause
        assert!(started.elapsed() >= Duration::from_millis(1050));

        let sent = client.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://localhost:8080/login");
        assert_eq!(
            sent[0].headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        let body = sent[0].body.as_ref().unwrap().as_object().unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body["username"].as_str(), Some(outcome.username.as_str()));
        assert_eq!(body["password"].as_str(), Some("testpassword123"));
        assert!(outcome.username.ends_with("@katakode.com"));

        assert_eq!(outcome.sample.status, 200);
        assert!(outcome.checks.iter().all(|c| c.passed));
        assert_eq!(recorder.requests.lock().len(), 1);
        assert_eq!(recorder.checks.lock().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_fails_status_check_only() {
        let (scenario, _client, recorder, mut vu) =
            setup(StubClient::answering(500, Duration::from_millis(20)));

        let outcome = scenario.run_once(&mut vu).await;

        assert_eq!(outcome.sample.status, 500);
        assert!(outcome.sample.failed);
        assert_eq!(outcome.checks[0].name, "status is 200 or 401");
        assert!(!outcome.checks[0].passed);
        assert_eq!(outcome.checks[1].name, "response time < 500ms");
        assert!(outcome.checks[1].passed);
        assert_eq!(recorder.checks.lock().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_unauthorized_response() {
        let (scenario, _client, _recorder, mut vu) =
            setup(StubClient::answering(401, Duration::from_millis(800)));

        let outcome = scenario.run_once(&mut vu).await;
        assert!(outcome.checks[0].passed);
        assert!(!outcome.checks[1].passed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_still_completes() {
        let (scenario, _client, recorder, mut vu) = setup(StubClient::unreachable());

        let started = Instant::now();
        let outcome = scenario.run_once(&mut vu).await;

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(outcome.sample.status, 0);
        assert!(outcome.sample.failed);
        assert!(outcome.sample.error.is_some());
        assert!(!outcome.checks[0].passed);

        let requests = recorder.requests.lock();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_iterations_are_independent() {
        let (scenario, client, recorder, mut vu) =
            setup(StubClient::answering(401, Duration::from_millis(5)));

        for _ in 0..5 {
            scenario.iteration(&mut vu).await;
        }

        assert_eq!(client.sent.lock().len(), 5);
        assert_eq!(recorder.requests.lock().len(), 5);
        assert_eq!(recorder.checks.lock().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampled_iteration_logs_username_and_status() {
        let (logs, _guard) = capture_logs();
        let (scenario, mut vu) =
            scenario_with_log_rate(1.0, StubClient::answering(401, Duration::from_millis(5)));

        let outcome = scenario.run_once(&mut vu).await;

        assert!(outcome.logged);
        let output = logs.contents();
        let expected = format!("Testing username: {}, Status: 401", outcome.username);
        assert!(output.contains(&expected), "{}", output);
        assert!(output.contains(CONSOLE_TARGET), "{}", output);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_logs_status_zero() {
        let (logs, _guard) = capture_logs();
        let (scenario, mut vu) = scenario_with_log_rate(1.0, StubClient::unreachable());

        let outcome = scenario.run_once(&mut vu).await;

        assert!(outcome.logged);
        let expected = format!("Testing username: {}, Status: 0", outcome.username);
        assert!(logs.contents().contains(&expected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_log_rate_is_silent() {
        let (logs, _guard) = capture_logs();
        let (scenario, mut vu) =
            scenario_with_log_rate(0.0, StubClient::answering(200, Duration::from_millis(5)));

        for _ in 0..50 {
            assert!(!scenario.run_once(&mut vu).await.logged);
        }
        assert!(!logs.contents().contains("Testing username"));
    }

    #[test]
    fn test_rejects_inverted_user_id_range() {
        let mut config = LoadTestConfig::default();
        config.target.min_user_id = 10;
        config.target.max_user_id = 1;
        let client = Arc::new(StubClient::answering(200, Duration::ZERO));

        assert!(LoginScenario::new(&config, client).is_err());
    }

    #[test]
    fn test_options_carry_profile_and_thresholds() {
        let (scenario, _client, _recorder, _vu) =
            setup(StubClient::answering(200, Duration::ZERO));
        assert_eq!(scenario.name(), "login");
        assert_eq!(scenario.options().profile.stages.len(), 3);
        assert_eq!(scenario.options().thresholds.len(), 2);
    }
}
