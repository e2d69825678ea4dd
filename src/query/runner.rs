//! Query run orchestration.
//!
//! Ties the query service, the polling loop, and object storage together:
//! submit, wait for completion, locate the result object, fetch and parse it.

use crate::config::QueryConfig;
use crate::error::Result;
use crate::query::{wait_for_results, QueryService, QuerySpec, ResultTable, Sleeper};
use crate::storage::{object_filename, ObjectStore};

/// Runs a configured query end to end.
pub struct QueryRunner<'a> {
    service: &'a dyn QueryService,
    store: &'a dyn ObjectStore,
    sleeper: &'a dyn Sleeper,
}

impl<'a> QueryRunner<'a> {
    /// Creates a new runner over the given collaborators.
    pub fn new(
        service: &'a dyn QueryService,
        store: &'a dyn ObjectStore,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            service,
            store,
            sleeper,
        }
    }

    /// Submits the configured query and returns its parsed results.
    ///
    /// Returns `Ok(None)` when the execution settles without results being
    /// available. A failed execution is an error.
    pub async fn run(
        &self,
        config: &QueryConfig,
        region: Option<&str>,
    ) -> Result<Option<ResultTable>> {
        let spec = QuerySpec {
            sql: config.sql()?.to_string(),
            database: config.database()?.to_string(),
            output_location: config.output_location()?,
            workgroup: config.workgroup.clone(),
            region: region.map(str::to_string),
        };

        let id = self.service.submit(&spec).await?;
        println!("Query execution id: {id}");

        let available =
            wait_for_results(self.service, self.sleeper, config.poll_interval(), &id).await?;
        if !available {
            return Ok(None);
        }

        println!("Fetching results...");
        let location = self.service.output_location(&id).await?;

        // The result object lives under the configured prefix; only the
        // filename is taken from the reported location.
        let filename = object_filename(&location)?;
        let key = format!("{}/{}", config.output_path, filename);

        let body = self.store.fetch(config.bucket()?, &key).await?;
        let table = ResultTable::from_csv(&body)?;
        Ok(Some(table))
    }
}
