//! Input parsing for timesheet and reference payroll exports.
//!
//! Parsers collect row-level problems instead of aborting so a single bad
//! row never blocks a pay run; only an unusable file layout is an error.

mod duration;
mod reference;
mod timesheet;

pub(crate) use duration::parse_hours_minutes;
pub use duration::{MAX_ENTRY_MINUTES, parse_duration, parse_duration_hours};
pub use reference::{match_references, normalize_name, parse_reference_payroll, ReferenceMatch};
pub use timesheet::{parse_activity_date, parse_timesheet, parse_timesheets, ParsedTimesheet};
