//! Cron hour-field shifting.
//!
//! Schedule expressions use the six-field textual form
//! `cron(<min> <hour> <day> <month> <weekday> <year>)`. The hour field may
//! hold multiple comma-separated groups, each a single hour or a dashed
//! range, e.g. `"18-23,0-2"`. Shifting moves every hour token by one,
//! wrapping at the day boundary, and preserves the group structure exactly.

use super::clock::HourShift;
use crate::error::{OpskitError, Result};

/// Shifts every hour token in a cron hour field by one hour.
///
/// The field is split on `,` into groups and each group on `-` into tokens;
/// token values wrap 23 -> 0 going forward and 0 -> 23 going back. Group
/// count, token count, and ordering are preserved. Tokens that do not parse
/// as integers are an error; no other range validation is applied.
pub fn shift_hour_field(field: &str, shift: HourShift) -> Result<String> {
    let groups = field
        .split(',')
        .map(|group| {
            let tokens = group
                .split('-')
                .map(|token| shift_token(token, shift))
                .collect::<Result<Vec<_>>>()?;
            Ok(tokens.join("-"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(groups.join(","))
}

/// Shifts a single hour token, wrapping at the day boundary.
fn shift_token(token: &str, shift: HourShift) -> Result<String> {
    match (shift, token) {
        (HourShift::Forward, "23") => Ok("0".to_string()),
        (HourShift::Back, "0") => Ok("23".to_string()),
        _ => {
            let hour: i32 = token.parse().map_err(|_| {
                OpskitError::schedule(format!("invalid hour token '{token}' in cron field"))
            })?;
            let shifted = match shift {
                HourShift::Forward => hour + 1,
                HourShift::Back => hour - 1,
            };
            Ok(shifted.to_string())
        }
    }
}

/// Splits a `cron(...)` schedule expression into its six fields.
///
/// The wrapper is removed by position: everything between the fifth
/// character and the final one, split on single spaces. Malformed input is
/// split the same way rather than rejected; only a string too short to
/// slice is an error.
pub fn split_expression(expression: &str) -> Result<Vec<String>> {
    let end = expression.len().saturating_sub(1);
    let inner = expression.get(5..end).ok_or_else(|| {
        OpskitError::schedule(format!("schedule expression too short: '{expression}'"))
    })?;

    Ok(inner.split(' ').map(str::to_string).collect())
}

/// Reassembles fields produced by [`split_expression`] into a full
/// `cron(...)` expression.
pub fn join_expression(fields: &[String]) -> String {
    format!("cron({})", fields.join(" "))
}

/// Applies an hour shift to a full schedule expression.
///
/// The hour field is the second space-separated field of the expression.
pub fn shift_expression(expression: &str, shift: HourShift) -> Result<String> {
    let mut fields = split_expression(expression)?;
    if fields.len() < 2 {
        return Err(OpskitError::schedule(format!(
            "schedule expression has no hour field: '{expression}'"
        )));
    }

    let shifted = shift_hour_field(&fields[1], shift)?;
    fields[1] = shifted;
    Ok(join_expression(&fields))
}
