//! Batch rescheduling of rule cron expressions.
//!
//! Walks the configured rule list in order, shifting each rule's hour field
//! and writing the new expression back. Persisting is best-effort per rule:
//! a rejected update is recorded and the batch continues.

use tracing::{info, warn};

use super::clock::HourShift;
use super::cron::shift_expression;
use super::rules::RuleStore;
use crate::error::Result;

/// Outcome of a rescheduling batch: the rule names that were updated and
/// the ones whose update was rejected, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RescheduleOutcome {
    /// Rules whose new expression was persisted.
    pub updated: Vec<String>,
    /// Rules whose persist call failed.
    pub failed: Vec<String>,
}

/// Shifts the hour field of every rule in the list.
///
/// Reading a rule or shifting its expression is expected to succeed; either
/// failing aborts the batch. Only the write back is fallible per rule:
/// its error is logged, the rule lands in the failure list, and processing
/// moves on. No rollback, no retry.
pub async fn reschedule_rules(
    store: &dyn RuleStore,
    rules: &[String],
    shift: HourShift,
) -> Result<RescheduleOutcome> {
    let mut outcome = RescheduleOutcome::default();

    for name in rules {
        let current = store.describe(name).await?;
        let updated = shift_expression(&current, shift)?;

        match store.put(name, &updated).await {
            Ok(()) => {
                info!("Updated rule {}: {} -> {}", name, current, updated);
                outcome.updated.push(name.clone());
            }
            Err(e) => {
                warn!("Failed to update rule {}: {}", name, e);
                outcome.failed.push(name.clone());
            }
        }
    }

    Ok(outcome)
}
