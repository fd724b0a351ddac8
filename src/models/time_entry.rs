//! Timesheet entry models.
//!
//! This module contains the [`TimeEntry`] type produced by the timesheet parser,
//! the [`EntryKey`] used to refer to a single entry across the two run phases,
//! and [`ParseIssue`] for rows that could not be read.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::WorkedTime;

/// A single worked-time row from a weekly timesheet export.
///
/// Entries are immutable once parsed; allocation produces separate
/// [`EntryContribution`](super::EntryContribution) rows rather than
/// modifying them.
///
/// # Example
///
/// ```
/// use job_cost_engine::models::{TimeEntry, WorkedTime};
/// use chrono::NaiveDate;
///
/// let entry = TimeEntry {
///     employee_name: "Lori A. Frye".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     project: "Harbor Street Remodel".to_string(),
///     duration: WorkedTime::from_minutes(480),
///     is_billable: true,
///     week: 1,
///     source_row: 7,
/// };
///
/// assert_eq!(
///     entry.key().as_str(),
///     "Lori A. Frye|1|2025-03-03|Harbor Street Remodel|8"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// The employee name exactly as it appeared in the employee marker row.
    pub employee_name: String,
    /// The activity date.
    pub date: NaiveDate,
    /// The customer or project the time was booked to.
    pub project: String,
    /// The worked duration.
    pub duration: WorkedTime,
    /// Whether the time is billable to the customer.
    pub is_billable: bool,
    /// Which weekly export the entry came from (1 or 2).
    pub week: u8,
    /// The 1-based line number in the source export.
    pub source_row: usize,
}

impl TimeEntry {
    /// Returns the entry duration as decimal hours.
    pub fn hours(&self) -> Decimal {
        self.duration.hours()
    }

    /// Returns the stable key identifying this entry.
    pub fn key(&self) -> EntryKey {
        EntryKey::new(
            &self.employee_name,
            self.week,
            self.date,
            &self.project,
            self.duration,
        )
    }
}

/// Stable identifier of a [`TimeEntry`].
///
/// Composed of `employee|week|date|project|hours`, with hours rendered with at
/// most four decimal places and no trailing zeros. The key does not depend on
/// row order, so it survives re-exports of the same timesheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    /// Builds the key for the given entry fields.
    pub fn new(
        employee: &str,
        week: u8,
        date: NaiveDate,
        project: &str,
        duration: WorkedTime,
    ) -> Self {
        let hours = duration.hours().round_dp(4).normalize();
        Self(format!(
            "{employee}|{week}|{}|{project}|{hours}",
            date.format("%Y-%m-%d")
        ))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntryKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A timesheet row that could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// Which weekly export the row came from (1 or 2).
    pub week: u8,
    /// The 1-based line number in the source export.
    pub row: usize,
    /// What was wrong with the row.
    pub message: String,
}
