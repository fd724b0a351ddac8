//! Job cost report models.
//!
//! This module contains the [`JobCostReport`] returned by phase 2 of a run and
//! the per-employee structures it is built from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AuditTrace, EntryContribution, LineItemCost, ParseIssue, PayPeriod, PayType,
    ReconciliationResult, ReconciliationSummary, WeeklyAggregate, WorkedTime,
};
use crate::error::EngineError;

/// Costed totals for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// The employee name.
    pub employee: String,
    /// Hourly or salaried.
    pub pay_type: PayType,
    /// All hours worked over the period.
    pub total_hours: WorkedTime,
    /// Hours paid: `min(total, standard period hours)` for salaried, total for hourly.
    pub payrolled_hours: WorkedTime,
    /// Hours costed at the regular (base or adjusted) rate.
    pub regular_hours: WorkedTime,
    /// Hours costed at the overtime rate.
    pub overtime_hours: WorkedTime,
    /// The roster base rate.
    pub base_rate: Decimal,
    /// The adjusted rate, for salaried employees over the standard hours.
    pub adjusted_rate: Option<Decimal>,
    /// The overtime rate, for hourly employees with overtime.
    pub overtime_rate: Option<Decimal>,
    /// Sum of the employee's rounded line items.
    pub total_cost: Decimal,
    /// Weekly hour aggregates.
    pub weeks: Vec<WeeklyAggregate>,
    /// Reconciliation against the reference payroll, when one was supplied.
    pub reconciliation: Option<ReconciliationResult>,
}

/// An employee excluded from the report because costing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFailure {
    /// The employee name as it appeared in the timesheet.
    pub employee: String,
    /// The machine-readable error code.
    pub code: String,
    /// The error message.
    pub message: String,
}

impl EmployeeFailure {
    /// Builds a failure record for an employee from the error that excluded them.
    pub fn new(employee: impl Into<String>, error: &EngineError) -> Self {
        Self {
            employee: employee.into(),
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// The complete result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCostReport {
    /// The run this report was produced for.
    pub run_id: Uuid,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that produced the report.
    pub engine_version: String,
    /// The dates covered by the timesheet entries.
    pub pay_period: Option<PayPeriod>,
    /// The multiplier used for overtime rates.
    pub overtime_multiplier: Decimal,
    /// Line items sorted by employee then project.
    pub line_items: Vec<LineItemCost>,
    /// Per-employee totals sorted by employee.
    pub employees: Vec<EmployeeSummary>,
    /// Unrounded per-entry contributions.
    pub entries: Vec<EntryContribution>,
    /// Employees excluded because of an error.
    pub failures: Vec<EmployeeFailure>,
    /// Timesheet rows that could not be parsed.
    pub parse_issues: Vec<ParseIssue>,
    /// Owners excluded from job costing.
    pub excluded_owners: Vec<String>,
    /// Reconciliation summary, when a reference payroll was supplied.
    pub reconciliation: Option<ReconciliationSummary>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl JobCostReport {
    /// Returns the sum of all line item costs.
    pub fn total_cost(&self) -> Decimal {
        self.line_items.iter().map(|line| line.total_cost).sum()
    }

    /// Returns the line items for one employee, in project order.
    pub fn line_items_for<'a>(
        &'a self,
        employee: &'a str,
    ) -> impl Iterator<Item = &'a LineItemCost> + 'a {
        self.line_items
            .iter()
            .filter(move |line| line.employee == employee)
    }

    /// Returns the summary for one employee.
    pub fn employee(&self, name: &str) -> Option<&EmployeeSummary> {
        self.employees.iter().find(|summary| summary.employee == name)
    }
}
