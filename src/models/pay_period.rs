//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type describing the date range
//! covered by a run's two weekly exports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TimeEntry;

/// The date range covered by a bi-weekly run.
///
/// # Example
///
/// ```
/// use job_cost_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let pay_period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
/// };
///
/// assert!(pay_period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Returns the smallest period containing every entry date, or `None`
    /// when there are no entries.
    pub fn spanning<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> Option<Self> {
        entries.into_iter().fold(None, |period, entry| match period {
            None => Some(PayPeriod {
                start_date: entry.date,
                end_date: entry.date,
            }),
            Some(period) => Some(PayPeriod {
                start_date: period.start_date.min(entry.date),
                end_date: period.end_date.max(entry.date),
            }),
        })
    }

    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkedTime;

    fn entry_on(day: u32) -> TimeEntry {
        TimeEntry {
            employee_name: "Lori A. Frye".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            project: "Harbor Street Remodel".to_string(),
            duration: WorkedTime::from_hours(8),
            is_billable: true,
            week: 1,
            source_row: 1,
        }
    }

    #[test]
    fn test_spanning_uses_earliest_and_latest_dates() {
        let entries = vec![entry_on(5), entry_on(3), entry_on(14)];
        let period = PayPeriod::spanning(&entries).unwrap();
        assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_spanning_empty_is_none() {
        let entries: Vec<TimeEntry> = vec![];
        assert_eq!(PayPeriod::spanning(&entries), None);
    }

    #[test]
    fn test_contains_date_is_inclusive() {
        let period = PayPeriod {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
        };
        assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()));
        assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()));
    }
}
