//! Completion polling for submitted queries.
//!
//! The wait loop re-polls the execution state on a fixed interval for as
//! long as the query is queued or running. Sleeping goes through the
//! [`Sleeper`] trait so tests can observe the loop without real delays.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{OpskitError, Result};
use crate::query::{ExecutionId, QueryService, QueryState};

/// Clock abstraction for the polling loop.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the caller for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Waits for a query execution to leave the queued/running states.
///
/// Each observed state is printed to stdout. The loop has no retry cap and
/// no timeout; it runs until the service reports a settled state. Returns
/// `Ok(true)` when results are available, `Ok(false)` when the execution
/// settled without producing results, and an error when the query failed.
pub async fn wait_for_results(
    service: &dyn QueryService,
    sleeper: &dyn Sleeper,
    interval: Duration,
    id: &ExecutionId,
) -> Result<bool> {
    let mut state = service.query_state(id).await?;
    println!("Query state: {state}");

    while state.is_pending() {
        sleeper.sleep(interval).await;
        state = service.query_state(id).await?;
        println!("Query state: {state}");
    }

    match state {
        QueryState::Succeeded => Ok(true),
        QueryState::Failed => Err(OpskitError::query(format!("execution {id} failed"))),
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MockQueryService;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sleeper that counts calls and returns immediately.
    #[derive(Default)]
    struct CountingSleeper {
        sleeps: AtomicUsize,
    }

    impl CountingSleeper {
        fn count(&self) -> usize {
            self.sleeps.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Sleeper for CountingSleeper {
        async fn sleep(&self, _duration: Duration) {
            self.sleeps.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn id() -> ExecutionId {
        ExecutionId("exec-mock-1".to_string())
    }

    #[tokio::test]
    async fn test_queued_running_succeeded_sleeps_twice() {
        let service = MockQueryService::new(vec![
            QueryState::Queued,
            QueryState::Running,
            QueryState::Succeeded,
        ]);
        let sleeper = CountingSleeper::default();

        let available = wait_for_results(&service, &sleeper, Duration::from_secs(3), &id())
            .await
            .unwrap();

        assert!(available);
        assert_eq!(sleeper.count(), 2);
        assert_eq!(service.state_polls(), 3);
    }

    #[tokio::test]
    async fn test_immediate_success_never_sleeps() {
        let service = MockQueryService::new(vec![QueryState::Succeeded]);
        let sleeper = CountingSleeper::default();

        let available = wait_for_results(&service, &sleeper, Duration::from_secs(3), &id())
            .await
            .unwrap();

        assert!(available);
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_failed_query_is_error() {
        let service = MockQueryService::new(vec![QueryState::Queued, QueryState::Failed]);
        let sleeper = CountingSleeper::default();

        let err = wait_for_results(&service, &sleeper, Duration::from_secs(3), &id())
            .await
            .unwrap_err();

        assert_eq!(err.category(), "Query Error");
        assert_eq!(sleeper.count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_state_is_not_available_and_not_error() {
        let service = MockQueryService::new(vec![QueryState::Unknown]);
        let sleeper = CountingSleeper::default();

        let available = wait_for_results(&service, &sleeper, Duration::from_secs(3), &id())
            .await
            .unwrap();

        assert!(!available);
        assert_eq!(sleeper.count(), 0);
    }
}
