//! Schedule maintenance for opskit.
//!
//! Covers seasonal clock-change detection, cron hour-field shifting, and
//! the batch rescheduler that applies a shift to every configured rule.

pub mod clock;
pub mod cron;
pub mod rescheduler;
pub mod rules;

pub use clock::{shift_required, HourShift};
pub use cron::{shift_expression, shift_hour_field};
pub use rescheduler::{reschedule_rules, RescheduleOutcome};
pub use rules::{HttpRuleStore, MockRuleStore, RuleStore};
