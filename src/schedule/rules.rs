//! Scheduled-rule service abstraction.
//!
//! Rules are named schedules held by a remote service; each carries a
//! `cron(...)` schedule expression that can be read back and replaced.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::config::ServiceConfig;
use crate::error::{OpskitError, Result};

/// Trait defining the interface to the scheduled-rule service.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Returns the current schedule expression of a rule.
    async fn describe(&self, name: &str) -> Result<String>;

    /// Replaces the schedule expression of a rule.
    async fn put(&self, name: &str, expression: &str) -> Result<()>;
}

/// Rule service client speaking JSON over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpRuleStore {
    endpoint: String,
    token: String,
    client: Client,
}

impl HttpRuleStore {
    /// Creates a new client from the shared service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OpskitError::schedule(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint()?.trim_end_matches('/').to_string(),
            token: config.token()?.to_string(),
            client,
        })
    }
}

#[async_trait]
impl RuleStore for HttpRuleStore {
    async fn describe(&self, name: &str) -> Result<String> {
        let url = format!("{}/rules/{}", self.endpoint, name);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.token)
            .send()
            .await
            .map_err(|e| OpskitError::schedule(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(OpskitError::schedule(format!("rule '{name}' not found")));
        }
        if !status.is_success() {
            return Err(OpskitError::schedule(format!(
                "Rule service error ({status}) describing '{name}'"
            )));
        }

        let rule: RuleResponse = response
            .json()
            .await
            .map_err(|e| OpskitError::schedule(format!("Failed to parse response: {e}")))?;

        Ok(rule.schedule_expression)
    }

    async fn put(&self, name: &str, expression: &str) -> Result<()> {
        let url = format!("{}/rules/{}", self.endpoint, name);
        let request = PutRuleRequest {
            schedule_expression: expression,
        };

        let response = self
            .client
            .put(&url)
            .header("x-api-key", &self.token)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OpskitError::schedule(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpskitError::schedule(format!(
                "Rule service error ({status}) updating '{name}'"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RuleResponse {
    schedule_expression: String,
}

#[derive(Debug, Serialize)]
struct PutRuleRequest<'a> {
    schedule_expression: &'a str,
}

/// In-memory rule store for testing.
///
/// Individual rules can be marked so that updating them fails, to exercise
/// the per-rule failure handling of the rescheduler.
#[derive(Debug, Default)]
pub struct MockRuleStore {
    rules: Mutex<HashMap<String, String>>,
    failing_puts: HashSet<String>,
}

impl MockRuleStore {
    /// Creates an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule with the given schedule expression.
    pub fn with_rule(self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.rules
            .lock()
            .expect("rules lock")
            .insert(name.into(), expression.into());
        self
    }

    /// Marks a rule so that `put` calls against it fail.
    pub fn with_failing_put(mut self, name: impl Into<String>) -> Self {
        self.failing_puts.insert(name.into());
        self
    }

    /// Returns the stored expression for a rule, if any.
    pub fn expression(&self, name: &str) -> Option<String> {
        self.rules.lock().expect("rules lock").get(name).cloned()
    }
}

#[async_trait]
impl RuleStore for MockRuleStore {
    async fn describe(&self, name: &str) -> Result<String> {
        self.rules
            .lock()
            .expect("rules lock")
            .get(name)
            .cloned()
            .ok_or_else(|| OpskitError::schedule(format!("rule '{name}' not found")))
    }

    async fn put(&self, name: &str, expression: &str) -> Result<()> {
        if self.failing_puts.contains(name) {
            return Err(OpskitError::schedule(format!(
                "rule '{name}' rejected the update"
            )));
        }

        self.rules
            .lock()
            .expect("rules lock")
            .insert(name.to_string(), expression.to_string());
        Ok(())
    }
}
