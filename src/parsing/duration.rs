//! `HH:MM` duration parsing.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::WorkedTime;

/// Longest duration a single row may carry: one full week.
pub const MAX_ENTRY_MINUTES: u32 = 24 * 7 * 60;

/// Parses an `HH:MM` duration.
///
/// Hours are one or more ASCII digits, minutes exactly two digits in `00..=59`.
/// A row longer than one week (`168:00`) is rejected. Surrounding whitespace
/// is ignored. Anything else is a
/// [`EngineError::FormatError`]; the caller decides whether to skip the row
/// or abort.
///
/// # Example
///
/// ```
/// use job_cost_engine::parsing::parse_duration;
///
/// let time = parse_duration("40:30").unwrap();
/// assert_eq!(time.minutes(), 2430);
///
/// assert!(parse_duration("7.5").is_err());
/// assert!(parse_duration("07:75").is_err());
/// ```
pub fn parse_duration(input: &str) -> EngineResult<WorkedTime> {
    let time = parse_hours_minutes(input)?;
    if time.minutes() > MAX_ENTRY_MINUTES {
        return Err(EngineError::FormatError {
            value: input.to_string(),
            message: "duration exceeds 168:00".to_string(),
        });
    }
    Ok(time)
}

/// Parses `HH:MM` with no upper bound other than `u32` minutes. Used for
/// aggregate quantities, which may exceed a single row's limit.
pub(crate) fn parse_hours_minutes(input: &str) -> EngineResult<WorkedTime> {
    let trimmed = input.trim();
    let format_error = |message: &str| EngineError::FormatError {
        value: input.to_string(),
        message: message.to_string(),
    };

    let (hours, minutes) = trimmed
        .split_once(':')
        .ok_or_else(|| format_error("expected HH:MM"))?;

    if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error("hours must be one or more digits"));
    }
    if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error("minutes must be exactly two digits"));
    }

    let hours: u32 = hours
        .parse()
        .map_err(|_| format_error("hours out of range"))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| format_error("minutes out of range"))?;
    if minutes > 59 {
        return Err(format_error("minutes must be between 00 and 59"));
    }

    hours
        .checked_mul(60)
        .and_then(|total| total.checked_add(minutes))
        .map(WorkedTime::from_minutes)
        .ok_or_else(|| format_error("hours out of range"))
}

/// Parses an `HH:MM` duration into decimal hours (`hours + minutes / 60`).
pub fn parse_duration_hours(input: &str) -> EngineResult<Decimal> {
    parse_duration(input).map(|time| time.hours())
}
