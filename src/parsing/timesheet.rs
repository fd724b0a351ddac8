//! Weekly timesheet export parsing.
//!
//! The export is a delimited text report: a few preamble lines, a header row,
//! then blocks of work rows each introduced by an employee marker row (a row
//! with the employee name in the first column and no activity date) and
//! closed by a `Total for ...` row.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::config::InputConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ParseIssue, TimeEntry};

use super::parse_duration;

const DATE_COLUMN: &str = "Activity date";
const PROJECT_COLUMN: &str = "Customer full name";
const DURATION_COLUMN: &str = "Duration";
const BILLABLE_COLUMN: &str = "Billable";

const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Entries and row-level issues read from one or more exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTimesheet {
    /// Work rows in source order.
    pub entries: Vec<TimeEntry>,
    /// Rows that were skipped because a field could not be parsed.
    pub issues: Vec<ParseIssue>,
}

impl ParsedTimesheet {
    /// Appends another parsed export.
    pub fn extend(&mut self, other: ParsedTimesheet) {
        self.entries.extend(other.entries);
        self.issues.extend(other.issues);
    }
}

struct Columns {
    date: usize,
    project: usize,
    duration: usize,
    billable: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> EngineResult<Self> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let missing: Vec<&str> = [DATE_COLUMN, PROJECT_COLUMN, DURATION_COLUMN]
            .into_iter()
            .filter(|name| !index.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::FormatError {
                value: missing.join(", "),
                message: "missing required timesheet columns".to_string(),
            });
        }

        Ok(Self {
            date: index[DATE_COLUMN],
            project: index[PROJECT_COLUMN],
            duration: index[DURATION_COLUMN],
            billable: index.get(BILLABLE_COLUMN).copied(),
        })
    }
}

/// Parses one weekly export.
///
/// Fails only when the file layout is unusable (no header row, a required
/// column missing, an unsupported delimiter). Work rows with an unreadable
/// date or duration are skipped and reported in
/// [`ParsedTimesheet::issues`].
///
/// # Example
///
/// ```
/// use job_cost_engine::config::InputConfig;
/// use job_cost_engine::parsing::parse_timesheet;
///
/// let export = "Time Activities\nAcme Builders\nMarch 3-9, 2025\n\n\
///     \tActivity date\tCustomer full name\tDuration\tBillable\n\
///     A\t\t\t\t\n\
///     \t03/03/2025\tAlpha\t08:00\tYes\n\
///     Total for A\t\t\t08:00\t\n";
///
/// let parsed = parse_timesheet(export, 1, &InputConfig::default()).unwrap();
/// assert_eq!(parsed.entries.len(), 1);
/// assert_eq!(parsed.entries[0].employee_name, "A");
/// assert!(parsed.entries[0].is_billable);
/// ```
pub fn parse_timesheet(
    content: &str,
    week: u8,
    input: &InputConfig,
) -> EngineResult<ParsedTimesheet> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let body = skip_lines(content, input.preamble_rows).ok_or_else(|| EngineError::FormatError {
        value: format!("week {week} export"),
        message: "missing header row".to_string(),
    })?;

    let delimiter = u8::try_from(input.delimiter).map_err(|_| EngineError::FormatError {
        value: input.delimiter.to_string(),
        message: "delimiter must be a single ASCII character".to_string(),
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers().map_err(|e| EngineError::FormatError {
        value: format!("week {week} export"),
        message: e.to_string(),
    })?;
    let columns = Columns::locate(headers)?;

    let mut parsed = ParsedTimesheet::default();
    let mut current_employee: Option<String> = None;

    for (index, record) in reader.records().enumerate() {
        // Header is line 1 of the body; data starts on line 2.
        let fallback_row = input.preamble_rows + index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                parsed.issues.push(ParseIssue {
                    week,
                    row: fallback_row,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let row = record
            .position()
            .map(|position| input.preamble_rows + position.line() as usize)
            .unwrap_or(fallback_row);

        let first = field(&record, 0);
        let date = field(&record, columns.date);

        if date.to_uppercase().contains("TOTAL") {
            continue;
        }

        if date.is_empty() {
            if !first.is_empty() && !is_total_label(first) {
                current_employee = Some(first.to_string());
            }
            continue;
        }

        let Some(employee) = current_employee.as_ref() else {
            debug!(week, row, "dropping work row before any employee marker");
            continue;
        };

        match parse_work_row(&record, &columns, employee, week, row) {
            Ok(entry) => parsed.entries.push(entry),
            Err(e) => parsed.issues.push(ParseIssue {
                week,
                row,
                message: e.to_string(),
            }),
        }
    }

    debug!(
        week,
        entries = parsed.entries.len(),
        issues = parsed.issues.len(),
        "parsed timesheet export"
    );
    Ok(parsed)
}

/// Parses both weekly exports of a pay period.
pub fn parse_timesheets(
    week1: &str,
    week2: &str,
    input: &InputConfig,
) -> EngineResult<ParsedTimesheet> {
    let mut parsed = parse_timesheet(week1, 1, input)?;
    parsed.extend(parse_timesheet(week2, 2, input)?);
    Ok(parsed)
}

/// Parses an activity date in `MM/DD/YYYY` or `YYYY-MM-DD` form.
pub fn parse_activity_date(input: &str) -> EngineResult<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| EngineError::FormatError {
            value: input.to_string(),
            message: "expected MM/DD/YYYY or YYYY-MM-DD".to_string(),
        })
}

fn parse_work_row(
    record: &StringRecord,
    columns: &Columns,
    employee: &str,
    week: u8,
    row: usize,
) -> EngineResult<TimeEntry> {
    let date = parse_activity_date(field(record, columns.date))?;
    let duration = parse_duration(field(record, columns.duration))?;
    let is_billable = columns
        .billable
        .is_some_and(|i| is_billable(field(record, i)));

    Ok(TimeEntry {
        employee_name: employee.to_string(),
        date,
        project: field(record, columns.project).to_string(),
        duration,
        is_billable,
        week,
        source_row: row,
    })
}

fn is_total_label(value: &str) -> bool {
    value.contains("Total for") || value.to_uppercase().starts_with("TOTAL")
}

fn is_billable(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

/// Returns the text after the first `lines` lines, or `None` if there are
/// not that many.
fn skip_lines(content: &str, lines: usize) -> Option<&str> {
    if lines == 0 {
        return Some(content);
    }
    content
        .match_indices('\n')
        .nth(lines - 1)
        .map(|(offset, _)| &content[offset + 1..])
}
