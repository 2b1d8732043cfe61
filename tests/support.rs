//! In-process mock login endpoint

#![allow(dead_code)]

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// One request as the mock server received it
#[derive(Debug, Clone)]
pub struct CapturedLogin {
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub struct MockLoginState {
    status: StatusCode,
    delay: Duration,
    pub received: Arc<Mutex<Vec<CapturedLogin>>>,
}

impl MockLoginState {
    pub fn received(&self) -> Vec<CapturedLogin> {
        self.received.lock().clone()
    }
}

async fn login_handler(
    State(state): State<MockLoginState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    state.received.lock().push(CapturedLogin {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    tokio::time::sleep(state.delay).await;

    let body = if state.status.is_success() {
        json!({ "message": "Login successful" })
    } else {
        json!({ "error": state.status.canonical_reason() })
    };
    (state.status, Json(body))
}

/// Start a `/login` endpoint answering every POST with `status` after `delay`
pub async fn start_login_server(status: u16, delay: Duration) -> Result<(String, MockLoginState)> {
    let state = MockLoginState {
        status: StatusCode::from_u16(status)?,
        delay,
        received: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/login", post(login_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok((format!("http://{}/login", addr), state))
}

/// URL of a port nothing is listening on
pub async fn closed_login_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}/login", addr))
}
