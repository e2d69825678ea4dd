//! Mock query service for testing.
//!
//! Returns a scripted sequence of execution states without any network.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{OpskitError, Result};
use crate::query::{ExecutionId, QueryService, QuerySpec, QueryState};

/// A mock query service driven by a scripted state sequence.
///
/// Each `query_state` call advances through the sequence; the final state
/// repeats once the script is exhausted.
pub struct MockQueryService {
    execution_id: String,
    states: Vec<QueryState>,
    output_location: Option<String>,
    cursor: Mutex<usize>,
    submitted: Mutex<Vec<QuerySpec>>,
}

impl MockQueryService {
    /// Creates a mock that reports the given states in order.
    pub fn new(states: Vec<QueryState>) -> Self {
        Self {
            execution_id: "exec-mock-1".to_string(),
            states,
            output_location: None,
            cursor: Mutex::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Sets the execution id returned from `submit`.
    pub fn with_execution_id(mut self, id: impl Into<String>) -> Self {
        self.execution_id = id.into();
        self
    }

    /// Sets the output location reported for the execution.
    pub fn with_output_location(mut self, location: impl Into<String>) -> Self {
        self.output_location = Some(location.into());
        self
    }

    /// Returns the specs submitted so far.
    pub fn submissions(&self) -> Vec<QuerySpec> {
        self.submitted.lock().expect("submissions lock").clone()
    }

    /// Returns how many times the state was polled.
    pub fn state_polls(&self) -> usize {
        *self.cursor.lock().expect("cursor lock")
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn submit(&self, spec: &QuerySpec) -> Result<ExecutionId> {
        self.submitted
            .lock()
            .expect("submissions lock")
            .push(spec.clone());
        Ok(ExecutionId(self.execution_id.clone()))
    }

    async fn query_state(&self, _id: &ExecutionId) -> Result<QueryState> {
        let mut cursor = self.cursor.lock().expect("cursor lock");
        let state = match self.states.get(*cursor) {
            Some(state) => *state,
            None => *self.states.last().unwrap_or(&QueryState::Unknown),
        };
        *cursor += 1;
        Ok(state)
    }

    async fn output_location(&self, id: &ExecutionId) -> Result<String> {
        self.output_location
            .clone()
            .ok_or_else(|| OpskitError::query(format!("execution {id} has no output location")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> QuerySpec {
        QuerySpec {
            sql: "SELECT 1".to_string(),
            database: "db".to_string(),
            output_location: "s3://bucket/results".to_string(),
            workgroup: None,
            region: None,
        }
    }

    #[tokio::test]
    async fn test_mock_records_submissions() {
        let mock = MockQueryService::new(vec![QueryState::Succeeded])
            .with_execution_id("exec-42");

        let id = mock.submit(&spec()).await.unwrap();
        assert_eq!(id, ExecutionId("exec-42".to_string()));
        assert_eq!(mock.submissions().len(), 1);
        assert_eq!(mock.submissions()[0].sql, "SELECT 1");
    }

    #[tokio::test]
    async fn test_mock_walks_state_script() {
        let mock = MockQueryService::new(vec![
            QueryState::Queued,
            QueryState::Running,
            QueryState::Succeeded,
        ]);
        let id = ExecutionId("exec-mock-1".to_string());

        assert_eq!(mock.query_state(&id).await.unwrap(), QueryState::Queued);
        assert_eq!(mock.query_state(&id).await.unwrap(), QueryState::Running);
        assert_eq!(mock.query_state(&id).await.unwrap(), QueryState::Succeeded);
        // Script exhausted: final state repeats.
        assert_eq!(mock.query_state(&id).await.unwrap(), QueryState::Succeeded);
        assert_eq!(mock.state_polls(), 4);
    }

    #[tokio::test]
    async fn test_mock_output_location() {
        let mock = MockQueryService::new(vec![QueryState::Succeeded])
            .with_output_location("s3://bucket/results/exec-mock-1.csv");
        let id = ExecutionId("exec-mock-1".to_string());

        assert_eq!(
            mock.output_location(&id).await.unwrap(),
            "s3://bucket/results/exec-mock-1.csv"
        );
    }

    #[tokio::test]
    async fn test_mock_missing_output_location_is_error() {
        let mock = MockQueryService::new(vec![QueryState::Succeeded]);
        let id = ExecutionId("exec-mock-1".to_string());
        assert!(mock.output_location(&id).await.is_err());
    }
}
