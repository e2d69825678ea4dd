//! Seasonal clock-change detection.
//!
//! In the UK the clocks go forward one hour at 1am on the last Sunday in
//! March, and back one hour at 2am on the last Sunday in October. Schedules
//! stored against UTC have to move the opposite way to keep firing at the
//! same local time.

use chrono::{Datelike, NaiveDate, Weekday};

/// Direction to move the stored hour field of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourShift {
    /// Stored hours move forward by one (clocks went back).
    Forward,
    /// Stored hours move back by one (clocks went forward).
    Back,
}

impl HourShift {
    /// Returns the shift as the signed string used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "+1",
            Self::Back => "-1",
        }
    }
}

impl std::fmt::Display for HourShift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Determines whether the given date is a clock-change day, and if so which
/// way the stored hours move.
///
/// The transition day is a Sunday falling on day 25-31 of March or October.
/// The day-of-month range is deliberate business logic, not a derived
/// last-Sunday computation; both months have 31 days so the range always
/// contains exactly one Sunday.
pub fn shift_required(date: NaiveDate) -> Option<HourShift> {
    if !(25..=31).contains(&date.day()) || date.weekday() != Weekday::Sun {
        return None;
    }

    match date.month() {
        // Clocks go forward in March: stored UTC hours move back.
        3 => Some(HourShift::Back),
        // Clocks go back in October: stored UTC hours move forward.
        10 => Some(HourShift::Forward),
        _ => None,
    }
}
