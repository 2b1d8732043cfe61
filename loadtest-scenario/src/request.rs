//! Login request body

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Body of one login attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "username": self.username,
            "password": self.password,
        })
    }
}
