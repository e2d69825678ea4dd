//! Object storage abstraction for opskit.
//!
//! Query results land in object storage; this module provides the trait for
//! fetching them, the HTTP implementation, and helpers for picking apart
//! output locations.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{OpskitError, Result};

/// Trait defining the interface to object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches an object and returns its body as text.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<String>;
}

/// Extracts the final path segment of a storage location URL.
///
/// Locations look like `s3://bucket/prefix/execution-id.csv`; the result
/// object's key is rebuilt from the configured prefix plus this filename.
pub fn object_filename(location: &str) -> Result<String> {
    let url = Url::parse(location)
        .map_err(|e| OpskitError::storage(format!("invalid output location '{location}': {e}")))?;

    let filename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            OpskitError::storage(format!("output location '{location}' has no filename"))
        })?;

    Ok(filename.to_string())
}

/// Object storage client speaking HTTPS.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    endpoint: String,
    token: String,
    client: Client,
}

impl HttpObjectStore {
    /// Creates a new client from the shared service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OpskitError::storage(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint()?.trim_end_matches('/').to_string(),
            token: config.token()?.to_string(),
            client,
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<String> {
        let url = format!("{}/objects/{}/{}", self.endpoint, bucket, key);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OpskitError::storage("Request timed out. Try again.")
                } else {
                    OpskitError::storage(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(OpskitError::storage(format!(
                "object {bucket}/{key} not found"
            )));
        }
        if !status.is_success() {
            return Err(OpskitError::storage(format!(
                "Storage service error ({status}) fetching {bucket}/{key}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| OpskitError::storage(format!("Failed to read object body: {e}")))
    }
}

/// In-memory object store for testing.
#[derive(Debug, Clone, Default)]
pub struct MockObjectStore {
    objects: HashMap<(String, String), String>,
}

impl MockObjectStore {
    /// Creates an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to the store.
    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.objects
            .insert((bucket.into(), key.into()), body.into());
        self
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<String> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| OpskitError::storage(format!("object {bucket}/{key} not found")))
    }
}
