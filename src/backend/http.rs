//! Blocking HTTP client for the booking backend

use std::time::Duration;

use reqwest::blocking::RequestBuilder;
use serde_json::Value;

use super::Backend;
use crate::config::Config;
use crate::types::{CabdashError, Result};

/// HTTP backend
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cabdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CabdashError::Http(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            base_url: config.api_url.clone(),
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request; non-2xx is an `Http` error, a bad body a `Parse` error
    fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .map_err(|e| CabdashError::Http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CabdashError::Http(format!("HTTP error! status: {}", status)));
        }

        response
            .json()
            .map_err(|e| CabdashError::Parse(format!("JSON parse error: {}", e)))
    }
}

impl Backend for ApiClient {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        self.send(self.client.get(&url))
    }

    fn put_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(url = %url, "PUT");
        self.send(self.client.put(&url).json(body))
    }
}
