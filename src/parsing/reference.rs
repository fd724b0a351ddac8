//! Reference payroll export parsing and name matching.
//!
//! The payroll system's export lists one row per employee with gross wages
//! and an hours breakdown, keyed by a `Last, First M.` name. Column headers
//! vary slightly between exports, so columns are found by substring
//! patterns rather than exact names.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::ReferencePayroll;

const EMPLOYEE_PATTERNS: &[&str] = &["employeeinformation", "employee"];
const GROSS_WAGES_PATTERNS: &[&str] = &["salary"];
const REGULAR_HOURS_PATTERNS: &[&str] = &["reghrs", "regularhours"];
const OVERTIME_HOURS_PATTERNS: &[&str] = &["o/thr", "othrs", "overtimehours"];
const PTO_PATTERNS: &[&str] = &["pto"];
const HOLIDAY_PATTERNS: &[&str] = &["holiday"];
const OTHER_PATTERNS: &[&str] = &["other", "bereav", "jury"];
const RATE_PATTERNS: &[&str] = &["newrates", "rate"];

const SUMMARY_ROW_PATTERNS: &[&str] = &["total", "all columns"];

struct Columns {
    employee: usize,
    gross_wages: usize,
    regular_hours: Option<usize>,
    overtime_hours: Option<usize>,
    pto: Option<usize>,
    holiday: Option<usize>,
    other: Option<usize>,
    rate: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> EngineResult<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.to_lowercase().replace(' ', ""))
            .collect();
        let find = |patterns: &[&str]| {
            normalized
                .iter()
                .position(|header| patterns.iter().any(|p| header.contains(p)))
        };
        let required = |patterns: &[&str], name: &str| {
            find(patterns).ok_or_else(|| EngineError::FormatError {
                value: name.to_string(),
                message: "missing required reference payroll column".to_string(),
            })
        };

        Ok(Self {
            employee: required(EMPLOYEE_PATTERNS, "Employee Information")?,
            gross_wages: required(GROSS_WAGES_PATTERNS, "Salary")?,
            regular_hours: find(REGULAR_HOURS_PATTERNS),
            overtime_hours: find(OVERTIME_HOURS_PATTERNS),
            pto: find(PTO_PATTERNS),
            holiday: find(HOLIDAY_PATTERNS),
            other: find(OTHER_PATTERNS),
            rate: find(RATE_PATTERNS),
        })
    }
}

/// Parses a reference payroll export (comma-separated, header row first).
///
/// Summary rows, rows without a name and rows with zero gross wages are
/// skipped. Unreadable numbers count as zero. When two rows normalize to the
/// same name the later one wins.
///
/// # Example
///
/// ```
/// use job_cost_engine::parsing::parse_reference_payroll;
/// use rust_decimal::Decimal;
///
/// let export = "Employee Information,Salary,Reg Hrs,O/T Hr\n\
///     \"Frye, Lori A.\",\"$3,061.80\",76,2\n\
///     Total All Columns,3061.80,76,2\n";
///
/// let records = parse_reference_payroll(export).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].normalized_name, "lori a frye");
/// assert_eq!(records[0].gross_wages, Decimal::new(306180, 2));
/// ```
pub fn parse_reference_payroll(content: &str) -> EngineResult<Vec<ReferencePayroll>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| EngineError::FormatError {
        value: "reference payroll export".to_string(),
        message: e.to_string(),
    })?;
    let columns = Columns::locate(headers)?;

    let mut records: Vec<ReferencePayroll> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| EngineError::FormatError {
            value: "reference payroll export".to_string(),
            message: e.to_string(),
        })?;

        let raw_name = record.get(columns.employee).unwrap_or("").trim();
        if raw_name.is_empty() {
            continue;
        }
        let lowered = raw_name.to_lowercase();
        if SUMMARY_ROW_PATTERNS.iter().any(|p| lowered.contains(p)) {
            continue;
        }

        let gross_wages = amount(&record, Some(columns.gross_wages));
        if gross_wages.is_zero() {
            continue;
        }

        let reference = ReferencePayroll {
            raw_name: raw_name.to_string(),
            normalized_name: normalize_name(raw_name),
            gross_wages,
            regular_hours: amount(&record, columns.regular_hours),
            overtime_hours: amount(&record, columns.overtime_hours),
            pto_hours: amount(&record, columns.pto),
            holiday_hours: amount(&record, columns.holiday),
            other_hours: amount(&record, columns.other),
            base_rate: columns
                .rate
                .map(|i| amount(&record, Some(i)))
                .filter(|rate| !rate.is_zero()),
        };

        match records
            .iter_mut()
            .find(|existing| existing.normalized_name == reference.normalized_name)
        {
            Some(existing) => *existing = reference,
            None => records.push(reference),
        }
    }

    debug!(records = records.len(), "parsed reference payroll export");
    Ok(records)
}

/// Normalizes a person's name for cross-system matching.
///
/// Whitespace is collapsed, periods removed and the result lowercased. A
/// name containing a comma is treated as `Last, First M.` and reordered to
/// `first m last`.
///
/// # Example
///
/// ```
/// use job_cost_engine::parsing::normalize_name;
///
/// assert_eq!(normalize_name("Frye,  Lori A."), "lori a frye");
/// assert_eq!(normalize_name("Lori A. Frye"), "lori a frye");
/// ```
pub fn normalize_name(name: &str) -> String {
    let cleaned = name
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match cleaned.split_once(',') {
        Some((last, first_middle)) => format!("{} {}", first_middle.trim(), last.trim())
            .trim()
            .to_string(),
        None => cleaned,
    }
}

/// Result of matching timesheet employees to reference records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMatch {
    /// Timesheet employee name to matched reference record.
    pub matched: BTreeMap<String, ReferencePayroll>,
    /// Timesheet employees with no reference record.
    pub unmatched_employees: Vec<String>,
    /// Raw names of reference records matched to no employee.
    pub unmatched_references: Vec<String>,
}

/// Matches timesheet employees to reference records.
///
/// Each employee is given as its timesheet name and optional roster alias.
/// Every employee first tries the exact normalized name, then the alias.
/// Only then do the remaining employees try first and last name only
/// (ignoring middle names and initials), so a partial match never takes a
/// record another employee matches exactly. Each reference record is matched
/// to at most one employee.
pub fn match_references<'a, I>(employees: I, references: &[ReferencePayroll]) -> ReferenceMatch
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let employees: Vec<(&str, String, Option<String>)> = employees
        .into_iter()
        .map(|(name, alias)| (name, normalize_name(name), alias.map(normalize_name)))
        .collect();
    let mut used: HashSet<usize> = HashSet::new();
    let mut found: Vec<Option<usize>> = vec![None; employees.len()];

    // Exact names and aliases claim their records before any partial match.
    for (slot, (_, normalized, alias)) in found.iter_mut().zip(&employees) {
        *slot = find_unused(references, &used, |r| r.normalized_name == *normalized).or_else(
            || {
                alias.as_ref().and_then(|alias| {
                    find_unused(references, &used, |r| r.normalized_name == *alias)
                })
            },
        );
        if let Some(index) = *slot {
            used.insert(index);
        }
    }

    for (slot, (_, normalized, _)) in found.iter_mut().zip(&employees) {
        if slot.is_some() {
            continue;
        }
        *slot = first_and_last(normalized).and_then(|wanted| {
            find_unused(references, &used, |r| {
                first_and_last(&r.normalized_name).as_deref() == Some(wanted.as_str())
            })
        });
        if let Some(index) = *slot {
            used.insert(index);
        }
    }

    let mut result = ReferenceMatch::default();
    for ((name, _, _), slot) in employees.iter().zip(found) {
        match slot {
            Some(index) => {
                result
                    .matched
                    .insert(name.to_string(), references[index].clone());
            }
            None => result.unmatched_employees.push(name.to_string()),
        }
    }

    result.unmatched_references = references
        .iter()
        .enumerate()
        .filter(|(i, _)| !used.contains(i))
        .map(|(_, r)| r.raw_name.clone())
        .collect();
    result
}

fn find_unused(
    references: &[ReferencePayroll],
    used: &HashSet<usize>,
    predicate: impl Fn(&ReferencePayroll) -> bool,
) -> Option<usize> {
    references
        .iter()
        .enumerate()
        .find(|(i, r)| !used.contains(i) && predicate(r))
        .map(|(i, _)| i)
}

fn first_and_last(normalized: &str) -> Option<String> {
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    match parts.as_slice() {
        [first, .., last] => Some(format!("{first} {last}")),
        _ => None,
    }
}

fn amount(record: &StringRecord, column: Option<usize>) -> Decimal {
    column
        .and_then(|i| record.get(i))
        .map(|raw| raw.trim().replace(['$', ','], ""))
        .and_then(|cleaned| Decimal::from_str(&cleaned).ok())
        .unwrap_or(Decimal::ZERO)
}
