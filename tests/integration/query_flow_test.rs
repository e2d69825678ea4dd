//! Query flow integration tests.
//!
//! Drive the full submit/poll/fetch/parse pipeline over mocks, checking the
//! polling cadence and the parsed output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use opskit::config::QueryConfig;
use opskit::query::runner::QueryRunner;
use opskit::query::{MockQueryService, QueryState, Sleeper};
use opskit::storage::MockObjectStore;

/// Sleeper that records requested sleeps and returns immediately.
#[derive(Default)]
struct RecordingSleeper {
    sleeps: AtomicUsize,
    last_interval: Arc<std::sync::Mutex<Option<Duration>>>,
}

impl RecordingSleeper {
    fn count(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        *self.last_interval.lock().unwrap() = Some(duration);
    }
}

fn query_config() -> QueryConfig {
    QueryConfig {
        database: Some("mydatabase".to_string()),
        workgroup: None,
        bucket: Some("query-results".to_string()),
        output_path: "results".to_string(),
        sql: Some("SELECT * FROM tbldata LIMIT 10".to_string()),
        poll_interval_secs: 3,
    }
}

#[tokio::test]
async fn test_query_flow_end_to_end() {
    let service = MockQueryService::new(vec![
        QueryState::Queued,
        QueryState::Running,
        QueryState::Succeeded,
    ])
    .with_execution_id("exec-77")
    .with_output_location("s3://query-results/results/exec-77.csv");

    let store = MockObjectStore::new().with_object(
        "query-results",
        "results/exec-77.csv",
        "id,name,signup\n1,Alice,2024-01-02\n2,\"Bob, Jr.\",2024-02-03\n",
    );

    let sleeper = RecordingSleeper::default();
    let runner = QueryRunner::new(&service, &store, &sleeper);

    let table = runner
        .run(&query_config(), Some("eu-west-2"))
        .await
        .unwrap()
        .expect("results should be available");

    assert_eq!(table.columns, vec!["id", "name", "signup"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[1][1], "Bob, Jr.");

    // Initial check plus one recheck per pending state: two sleeps.
    assert_eq!(sleeper.count(), 2);
    assert_eq!(
        *sleeper.last_interval.lock().unwrap(),
        Some(Duration::from_secs(3))
    );
    assert_eq!(service.state_polls(), 3);
}

#[tokio::test]
async fn test_query_flow_renders_table() {
    let service = MockQueryService::new(vec![QueryState::Succeeded])
        .with_output_location("s3://query-results/results/exec-1.csv");
    let store = MockObjectStore::new().with_object(
        "query-results",
        "results/exec-1.csv",
        "id,name\n1,Alice\n2,Bob\n",
    );
    let sleeper = RecordingSleeper::default();
    let runner = QueryRunner::new(&service, &store, &sleeper);

    let table = runner.run(&query_config(), None).await.unwrap().unwrap();
    let rendered = table.render();

    assert!(rendered.starts_with("id  name\n"));
    assert!(rendered.contains("1   Alice\n"));
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn test_query_flow_not_available() {
    let service = MockQueryService::new(vec![QueryState::Running, QueryState::Unknown]);
    let store = MockObjectStore::new();
    let sleeper = RecordingSleeper::default();
    let runner = QueryRunner::new(&service, &store, &sleeper);

    let result = runner.run(&query_config(), None).await.unwrap();

    assert!(result.is_none());
    assert_eq!(sleeper.count(), 1);
}

#[tokio::test]
async fn test_query_flow_failure_surfaces_error() {
    let service = MockQueryService::new(vec![QueryState::Queued, QueryState::Failed]);
    let store = MockObjectStore::new();
    let sleeper = RecordingSleeper::default();
    let runner = QueryRunner::new(&service, &store, &sleeper);

    let err = runner.run(&query_config(), None).await.unwrap_err();

    assert_eq!(err.category(), "Query Error");
    assert!(err.to_string().contains("failed"));
}
