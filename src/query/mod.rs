//! Query service abstraction for opskit.
//!
//! Provides a trait-based interface to the managed query service, allowing
//! the HTTP implementation and test mocks to be used interchangeably.

mod http;
mod mock;
pub mod poller;
pub mod results;
pub mod runner;

pub use http::HttpQueryService;
pub use mock::MockQueryService;
pub use poller::{wait_for_results, Sleeper, TokioSleeper};
pub use results::ResultTable;

use crate::error::Result;
use async_trait::async_trait;

/// Opaque identifier for a submitted query execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionId(pub String);

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A query submission: the statement plus its execution context.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    /// Query text.
    pub sql: String,
    /// Target database within the service catalog.
    pub database: String,
    /// Where the service should write the result object.
    pub output_location: String,
    /// Workgroup the query runs under, if the service uses them.
    pub workgroup: Option<String>,
    /// Region identifier, if the service is regional.
    pub region: Option<String>,
}

/// Lifecycle states of a query execution.
///
/// Any status payload the service returns that is not one of the four known
/// states is coerced to `Unknown` rather than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl QueryState {
    /// Returns the state in the service's wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parses a state from the service's wire spelling.
    ///
    /// Unrecognized values become `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "QUEUED" => Self::Queued,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Returns true while the execution is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }
}

impl std::fmt::Display for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait defining the interface to the managed query service.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Submits a query for execution and returns its execution identifier.
    async fn submit(&self, spec: &QuerySpec) -> Result<ExecutionId>;

    /// Returns the current state of an execution.
    async fn query_state(&self, id: &ExecutionId) -> Result<QueryState>;

    /// Returns the storage location of the execution's result object.
    async fn output_location(&self, id: &ExecutionId) -> Result<String>;
}
