//! The login scenario
//!
//! A scenario declares its load shape and pass/fail gates through
//! [`Scenario::options`] and performs one unit of work per call to
//! [`Scenario::iteration`]. The runner decides how many iterations run
//! concurrently and for how long; the scenario only builds a request, sends
//! it, records what happened and pauses.

pub mod checks;
pub mod login;
pub mod metrics;
pub mod request;
pub mod sampler;
pub mod scenario;
pub mod username;

pub use checks::{CheckResult, Checks};
pub use login::{IterationOutcome, LoginScenario};
pub use metrics::{MetricsRecorder, RequestSample};
pub use request::LoginRequest;
pub use sampler::DiagnosticSampler;
pub use scenario::{Scenario, ScenarioOptions, VuContext};
pub use username::UsernameGenerator;
