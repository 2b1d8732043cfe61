//! HTTP client functionality for the login load test
//!
//! This crate provides the `HttpClient` seam the scenario sends through, a
//! pooled reqwest-backed implementation, and an offline mode that answers
//! from registered mocks.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager, MockResponse};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpRequest, HttpResponse};
