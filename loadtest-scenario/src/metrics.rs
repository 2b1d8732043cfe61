//! Samples an iteration hands to the runner

use crate::checks::CheckResult;
use loadtest_http::{HttpError, HttpResponse};
use std::ops::Range;
use std::time::Duration;

/// Statuses that do not count towards `http_req_failed`
pub const EXPECTED_STATUSES: Range<u16> = 200..400;

/// One request as seen by the metrics pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSample {
    /// Response status, `0` when no response was received
    pub status: u16,
    pub duration: Duration,
    pub failed: bool,
    /// Transport error kind, if the request never produced a response
    pub error: Option<String>,
}

impl RequestSample {
    pub fn from_response(response: &HttpResponse) -> Self {
        Self {
            status: response.status,
            duration: response.duration,
            failed: !EXPECTED_STATUSES.contains(&response.status),
            error: None,
        }
    }

    pub fn from_error(error: &HttpError, elapsed: Duration) -> Self {
        Self {
            status: 0,
            duration: elapsed,
            failed: true,
            error: Some(error.kind().to_string()),
        }
    }
}

/// Sink for the samples produced by iterations
///
/// Implementations are shared by every virtual user and must tolerate
/// concurrent calls.
pub trait MetricsRecorder: Send + Sync {
    fn record_request(&self, sample: &RequestSample);

    fn record_check(&self, check: &CheckResult);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            duration: Duration::from_millis(12),
            body_len: 0,
        }
    }

    #[test]
    fn test_expected_statuses_are_not_failures() {
        assert!(!RequestSample::from_response(&response(200)).failed);
        assert!(!RequestSample::from_response(&response(302)).failed);
        assert!(RequestSample::from_response(&response(401)).failed);
        assert!(RequestSample::from_response(&response(500)).failed);
    }

    #[test]
    fn test_error_sample() {
        let error = HttpError::NoMockResponse("POST:http://localhost:8080/login".to_string());
        let sample = RequestSample::from_error(&error, Duration::from_millis(3));
        assert_eq!(sample.status, 0);
        assert!(sample.failed);
        assert_eq!(sample.error.as_deref(), Some("no_mock"));
        assert_eq!(sample.duration, Duration::from_millis(3));
    }
}
