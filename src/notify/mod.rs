//! Notification publishing for opskit.
//!
//! The clock-shift run reports its outcome as a subject plus message
//! published to a fixed topic.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Mutex;

use crate::config::ServiceConfig;
use crate::error::{OpskitError, Result};
use crate::schedule::{HourShift, RescheduleOutcome};

/// Trait defining the interface to the notification service.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publishes a message to the configured topic.
    async fn publish(&self, subject: &str, message: &str) -> Result<()>;
}

/// Builds the subject line for a clock-shift report.
pub fn format_subject(account_alias: &str) -> String {
    format!("Clock adjustment {account_alias}")
}

/// Builds the clock-shift report message.
///
/// Both outcome lists are rendered one name per line; an empty list is
/// rendered as the literal `None`.
pub fn format_report(outcome: &RescheduleOutcome, shift: HourShift) -> String {
    let updated = section(&outcome.updated);
    let failed = section(&outcome.failed);

    format!(
        "The clocks have changed today!

An attempt has been made to automatically adjust the schedule
of each configured rule:

Time adjustment: {shift}

SUCCESSFUL UPDATES
{updated}

FAILED UPDATES
{failed}
"
    )
}

fn section(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join("\n")
    }
}

/// Notification client speaking JSON over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    endpoint: String,
    token: String,
    topic: String,
    client: Client,
}

impl HttpNotifier {
    /// Creates a new client publishing to the given topic.
    pub fn new(config: &ServiceConfig, topic: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OpskitError::notify(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint()?.trim_end_matches('/').to_string(),
            token: config.token()?.to_string(),
            topic: topic.into(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<()> {
        let url = format!("{}/topics/{}/publish", self.endpoint, self.topic);
        let request = PublishRequest { subject, message };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.token)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OpskitError::notify(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpskitError::notify(format!(
                "Notification service error ({status}) publishing to '{}'",
                self.topic
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    subject: &'a str,
    message: &'a str,
}

/// Recording notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    published: Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    /// Creates an empty recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the (subject, message) pairs published so far.
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().expect("published lock").clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<()> {
        self.published
            .lock()
            .expect("published lock")
            .push((subject.to_string(), message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(updated: &[&str], failed: &[&str]) -> RescheduleOutcome {
        RescheduleOutcome {
            updated: updated.iter().map(|s| s.to_string()).collect(),
            failed: failed.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_subject() {
        assert_eq!(format_subject("prod"), "Clock adjustment prod");
    }

    #[test]
    fn test_report_lists_names() {
        let report = format_report(&outcome(&["a", "b"], &["c"]), HourShift::Forward);
        assert!(report.contains("Time adjustment: +1"));
        assert!(report.contains("SUCCESSFUL UPDATES\na\nb\n"));
        assert!(report.contains("FAILED UPDATES\nc\n"));
    }

    #[test]
    fn test_report_empty_list_renders_none() {
        let report = format_report(&outcome(&["a"], &[]), HourShift::Back);
        assert!(report.contains("Time adjustment: -1"));
        assert!(report.contains("FAILED UPDATES\nNone\n"));

        let report = format_report(&outcome(&[], &[]), HourShift::Back);
        assert!(report.contains("SUCCESSFUL UPDATES\nNone\n"));
        assert!(report.contains("FAILED UPDATES\nNone\n"));
    }

    #[tokio::test]
    async fn test_mock_notifier_records() {
        let notifier = MockNotifier::new();
        notifier.publish("subject", "message").await.unwrap();

        let published = notifier.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "subject");
        assert_eq!(published[0].1, "message");
    }
}
