//! HTTP client for the managed query service.
//!
//! Implements the QueryService trait against the service's JSON API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::error::{OpskitError, Result};
use crate::query::{ExecutionId, QueryService, QuerySpec, QueryState};

/// Query service client speaking JSON over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    endpoint: String,
    token: String,
    client: Client,
}

impl HttpQueryService {
    /// Creates a new client from the shared service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OpskitError::query(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint()?.trim_end_matches('/').to_string(),
            token: config.token()?.to_string(),
            client,
        })
    }

    /// Fetches the execution status document for an execution.
    async fn describe(&self, id: &ExecutionId) -> Result<ExecutionResponse> {
        let url = format!("{}/queries/{}", self.endpoint, id);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.token)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OpskitError::query(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(parse_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| OpskitError::query(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn submit(&self, spec: &QuerySpec) -> Result<ExecutionId> {
        let request = SubmitRequest {
            sql: &spec.sql,
            database: &spec.database,
            output_location: &spec.output_location,
            workgroup: spec.workgroup.as_deref(),
            region: spec.region.as_deref(),
        };

        let url = format!("{}/queries", self.endpoint);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.token)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OpskitError::query(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(parse_error(status, &body));
        }

        let submitted: SubmitResponse = serde_json::from_str(&body)
            .map_err(|e| OpskitError::query(format!("Failed to parse response: {e}")))?;

        Ok(ExecutionId(submitted.execution_id))
    }

    async fn query_state(&self, id: &ExecutionId) -> Result<QueryState> {
        let response = self.describe(id).await?;

        // Any response without a recognizable state reads as Unknown.
        let state = response
            .status
            .and_then(|s| s.state)
            .map(|s| QueryState::parse(&s))
            .unwrap_or(QueryState::Unknown);

        Ok(state)
    }

    async fn output_location(&self, id: &ExecutionId) -> Result<String> {
        let response = self.describe(id).await?;

        response.output_location.ok_or_else(|| {
            OpskitError::query(format!("execution {id} has no output location"))
        })
    }
}

/// Maps transport-level failures onto query errors.
fn map_request_error(e: reqwest::Error) -> OpskitError {
    if e.is_timeout() {
        OpskitError::query("Request timed out. Try again.")
    } else if e.is_connect() {
        OpskitError::query("Failed to connect to the query service. Check your network.")
    } else {
        OpskitError::query(format!("Request failed: {e}"))
    }
}

/// Parses an API error response.
fn parse_error(status: reqwest::StatusCode, body: &str) -> OpskitError {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return OpskitError::query("Authentication failed. Check your OPSKIT_API_TOKEN.");
    }

    if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
        return OpskitError::query(format!(
            "Query service error: {}",
            error_response.error.message
        ));
    }

    OpskitError::query(format!("Query service error ({status}): {body}"))
}

// Query service API types

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    sql: &'a str,
    database: &'a str,
    output_location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    workgroup: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    execution_id: String,
}

#[derive(Debug, Deserialize)]
struct ExecutionResponse {
    #[serde(default)]
    status: Option<ExecutionStatus>,
    #[serde(default)]
    output_location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExecutionStatus {
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
