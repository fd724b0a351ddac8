//! Costed output rows.
//!
//! [`LineItemCost`] is the grouped per employee/project result that feeds the
//! allocation report; [`EntryContribution`] keeps the unrounded per-entry
//! amounts for audit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntryKey, WorkedTime};

/// Which rate a line item's regular hours were costed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// The roster base rate.
    Base,
    /// The salaried adjusted rate for a period over the standard hours.
    Adjusted,
}

/// Labor cost for one employee on one project over the pay period.
///
/// Costs are rounded half-up to cents. For an adjusted salaried employee the
/// last line item absorbs the rounding remainder so the employee's lines sum
/// exactly to the period salary.
///
/// # Example
///
/// ```
/// use job_cost_engine::models::{LineItemCost, RateKind, WorkedTime};
/// use rust_decimal::Decimal;
///
/// let line = LineItemCost {
///     employee: "A".to_string(),
///     project: "Alpha".to_string(),
///     regular_hours: WorkedTime::ZERO,
///     overtime_hours: WorkedTime::from_minutes(30),
///     rate: Decimal::new(100, 0),
///     overtime_rate: Decimal::new(150, 0),
///     regular_cost: Decimal::ZERO,
///     overtime_cost: Decimal::new(7500, 2),
///     total_cost: Decimal::new(7500, 2),
///     rate_kind: RateKind::Base,
/// };
/// assert_eq!(line.total_hours(), WorkedTime::from_minutes(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemCost {
    /// The employee name.
    pub employee: String,
    /// The project name.
    pub project: String,
    /// Hours costed at `rate`.
    pub regular_hours: WorkedTime,
    /// Hours costed at `overtime_rate`.
    pub overtime_hours: WorkedTime,
    /// The rate applied to regular hours.
    pub rate: Decimal,
    /// The rate applied to overtime hours.
    pub overtime_rate: Decimal,
    /// Cost of the regular hours.
    pub regular_cost: Decimal,
    /// Cost of the overtime hours.
    pub overtime_cost: Decimal,
    /// `regular_cost + overtime_cost`.
    pub total_cost: Decimal,
    /// Whether `rate` is the base or the adjusted salaried rate.
    pub rate_kind: RateKind,
}

impl LineItemCost {
    /// Returns regular plus overtime hours.
    pub fn total_hours(&self) -> WorkedTime {
        self.regular_hours + self.overtime_hours
    }
}

/// One timesheet entry after allocation and costing, before rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContribution {
    /// The key of the source entry.
    pub entry_key: EntryKey,
    /// The employee name.
    pub employee: String,
    /// The week number (1 or 2).
    pub week: u8,
    /// The activity date.
    pub date: NaiveDate,
    /// The project name.
    pub project: String,
    /// Whether the time is billable.
    pub is_billable: bool,
    /// The entry's regular hours.
    pub regular_hours: WorkedTime,
    /// The entry's overtime hours.
    pub overtime_hours: WorkedTime,
    /// The rate applied to regular hours.
    pub rate: Decimal,
    /// Unrounded regular cost.
    pub regular_cost: Decimal,
    /// Unrounded overtime cost.
    pub overtime_cost: Decimal,
}
