//! Weekly hours and overtime decision models.
//!
//! Phase 1 of a run produces [`WeeklyAggregate`]s and, for every hourly
//! employee week over the threshold, an [`OvertimeSituation`]. Phase 2
//! consumes one [`OvertimeDecision`] per situation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntryKey, WorkedTime};

/// Hours for one employee in one week, split into regular and overtime.
///
/// `regular + overtime == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    /// The employee name.
    pub employee: String,
    /// The week number (1 or 2).
    pub week: u8,
    /// All hours worked in the week.
    pub total: WorkedTime,
    /// Hours paid at the base rate.
    pub regular: WorkedTime,
    /// Hours paid at the overtime rate.
    pub overtime: WorkedTime,
}

impl WeeklyAggregate {
    /// Returns true if the week has overtime to allocate.
    pub fn has_overtime(&self) -> bool {
        !self.overtime.is_zero()
    }
}

/// An entry that may be chosen to receive a week's overtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeCandidate {
    /// The key to send back in an [`OvertimeDecision`].
    pub entry_key: EntryKey,
    /// The activity date.
    pub date: NaiveDate,
    /// The project the entry is booked to.
    pub project: String,
    /// The entry duration.
    pub hours: WorkedTime,
}

/// An hourly employee week whose overtime needs a target entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeSituation {
    /// The employee name.
    pub employee: String,
    /// The week number (1 or 2).
    pub week: u8,
    /// All hours worked in the week.
    pub total_hours: WorkedTime,
    /// Hours over the weekly threshold.
    pub overtime_hours: WorkedTime,
    /// Every entry of the week, in source row order.
    pub candidates: Vec<OvertimeCandidate>,
}

/// The entry chosen to receive an employee's overtime for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeDecision {
    /// The employee name.
    pub employee: String,
    /// The week number (1 or 2).
    pub week: u8,
    /// The key of the chosen candidate entry.
    pub entry_key: EntryKey,
}

/// Overtime decisions indexed by employee and week.
///
/// When the same employee/week appears more than once the last decision wins.
///
/// # Example
///
/// ```
/// use job_cost_engine::models::{OvertimeDecision, OvertimeDecisions};
///
/// let decisions: OvertimeDecisions = vec![OvertimeDecision {
///     employee: "A".to_string(),
///     week: 1,
///     entry_key: "A|1|2025-03-03|Alpha|0.5".into(),
/// }]
/// .into_iter()
/// .collect();
///
/// assert!(decisions.get("A", 1).is_some());
/// assert!(decisions.get("A", 2).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OvertimeDecisions {
    by_week: BTreeMap<(String, u8), EntryKey>,
}

impl OvertimeDecisions {
    /// Creates an empty decision set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a decision, replacing any earlier one for the same week.
    pub fn insert(&mut self, decision: OvertimeDecision) {
        self.by_week
            .insert((decision.employee, decision.week), decision.entry_key);
    }

    /// Returns the chosen entry key for an employee week.
    pub fn get(&self, employee: &str, week: u8) -> Option<&EntryKey> {
        self.by_week.get(&(employee.to_string(), week))
    }

    /// Returns the number of decisions.
    pub fn len(&self) -> usize {
        self.by_week.len()
    }

    /// Returns true if no decisions were supplied.
    pub fn is_empty(&self) -> bool {
        self.by_week.is_empty()
    }
}

impl FromIterator<OvertimeDecision> for OvertimeDecisions {
    fn from_iter<I: IntoIterator<Item = OvertimeDecision>>(iter: I) -> Self {
        let mut decisions = Self::new();
        for decision in iter {
            decisions.insert(decision);
        }
        decisions
    }
}
