//! Phase-1 run state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    AuditStep, EmployeeFailure, OvertimeSituation, ParseIssue, PayPeriod, PayType, TimeEntry,
    WeeklyAggregate,
};

/// An employee classified and aggregated in phase 1, ready for costing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedEmployee {
    /// The employee name as it appeared in the timesheet.
    pub name: String,
    /// Hourly or salaried.
    pub pay_type: PayType,
    /// The roster base rate.
    pub base_rate: Decimal,
    /// The roster alias used by the reference payroll export.
    pub reference_name: Option<String>,
    /// The employee's entries for the pay period, in source order.
    pub entries: Vec<TimeEntry>,
    /// Weekly hour aggregates.
    pub weeks: Vec<WeeklyAggregate>,
}

/// Everything phase 2 needs to finish a run.
///
/// Created by [`JobCostEngine::prepare`](super::JobCostEngine::prepare) and
/// held in a [`RunStore`](super::RunStore) until the overtime decisions arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// The run id.
    pub run_id: Uuid,
    /// When phase 1 ran.
    pub created_at: DateTime<Utc>,
    /// The dates covered by every parsed entry.
    pub pay_period: Option<PayPeriod>,
    /// Costable employees in name order.
    pub employees: Vec<PreparedEmployee>,
    /// Timesheet rows that could not be parsed.
    pub parse_issues: Vec<ParseIssue>,
    /// Employees excluded in phase 1, e.g. names missing from the roster.
    pub failures: Vec<EmployeeFailure>,
    /// Owners excluded from job costing.
    pub excluded_owners: Vec<String>,
    /// Weeks whose overtime needs a target entry.
    pub overtime_situations: Vec<OvertimeSituation>,
    /// Audit steps recorded in phase 1.
    pub audit_steps: Vec<AuditStep>,
}

impl RunContext {
    /// Returns true if any week needs an overtime decision before costing.
    pub fn requires_overtime_selection(&self) -> bool {
        !self.overtime_situations.is_empty()
    }

    /// Returns the timesheet names that have no roster record.
    pub fn unknown_employees(&self) -> Vec<String> {
        self.failures
            .iter()
            .filter(|failure| failure.code == "UNKNOWN_EMPLOYEE")
            .map(|failure| failure.employee.clone())
            .collect()
    }
}
