//! Parameter store abstraction for opskit.
//!
//! The clock-shift rule list lives in a remote parameter store as a single
//! comma-separated string.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::ServiceConfig;
use crate::error::{OpskitError, Result};

/// Trait defining the interface to the parameter store.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Reads a named parameter value.
    async fn get(&self, name: &str) -> Result<String>;
}

/// Splits a rule-list parameter value into rule names.
///
/// The value is split on commas exactly as stored; names are not trimmed.
pub fn split_rules(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

/// Parameter store client speaking JSON over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpParameterStore {
    endpoint: String,
    token: String,
    client: Client,
}

impl HttpParameterStore {
    /// Creates a new client from the shared service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OpskitError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint()?.trim_end_matches('/').to_string(),
            token: config.token()?.to_string(),
            client,
        })
    }
}

#[async_trait]
impl ParameterStore for HttpParameterStore {
    async fn get(&self, name: &str) -> Result<String> {
        let url = format!("{}/parameters", self.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .header("x-api-key", &self.token)
            .send()
            .await
            .map_err(|e| OpskitError::config(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(OpskitError::config(format!("parameter '{name}' not found")));
        }
        if !status.is_success() {
            return Err(OpskitError::config(format!(
                "Parameter store error ({status}) reading '{name}'"
            )));
        }

        let parameter: ParameterResponse = response
            .json()
            .await
            .map_err(|e| OpskitError::config(format!("Failed to parse response: {e}")))?;

        Ok(parameter.value)
    }
}

#[derive(Debug, Deserialize)]
struct ParameterResponse {
    value: String,
}

/// In-memory parameter store for testing.
#[derive(Debug, Clone, Default)]
pub struct MockParameterStore {
    parameters: HashMap<String, String>,
}

impl MockParameterStore {
    /// Creates an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter to the store.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl ParameterStore for MockParameterStore {
    async fn get(&self, name: &str) -> Result<String> {
        self.parameters
            .get(name)
            .cloned()
            .ok_or_else(|| OpskitError::config(format!("parameter '{name}' not found")))
    }
}
