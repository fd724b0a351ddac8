//! Reference payroll and reconciliation models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One employee's totals from the reference payroll export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePayroll {
    /// The name as it appeared in the export, e.g. `Frye, Lori A.`.
    pub raw_name: String,
    /// The name in `first m last` form used for matching.
    pub normalized_name: String,
    /// Gross wages paid for the period.
    pub gross_wages: Decimal,
    /// Regular hours paid.
    pub regular_hours: Decimal,
    /// Overtime hours paid.
    pub overtime_hours: Decimal,
    /// Paid time off hours.
    pub pto_hours: Decimal,
    /// Holiday hours.
    pub holiday_hours: Decimal,
    /// Other paid hours (bereavement, jury duty, ...).
    pub other_hours: Decimal,
    /// The base rate listed in the export, if any.
    pub base_rate: Option<Decimal>,
}

impl ReferencePayroll {
    /// Returns all paid hours across every category.
    pub fn total_hours(&self) -> Decimal {
        self.regular_hours
            + self.overtime_hours
            + self.pto_hours
            + self.holiday_hours
            + self.other_hours
    }
}

/// Outcome of comparing a calculated total with the reference total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// The variance is outside the tolerance.
    Mismatch,
    /// No reference record was matched to the employee.
    MissingReference,
    /// The variance is within the tolerance.
    Ok,
}

impl ReconciliationStatus {
    /// Returns the label used in the allocation report.
    pub fn label(&self) -> &'static str {
        match self {
            ReconciliationStatus::Ok => "Reconciled",
            ReconciliationStatus::Mismatch => "CHECK",
            ReconciliationStatus::MissingReference => "NO REFERENCE",
        }
    }
}

/// Reconciliation of one employee's calculated total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// The employee name.
    pub employee: String,
    /// Sum of the employee's rounded line items.
    pub calculated_total: Decimal,
    /// Gross wages from the reference export.
    pub reference_total: Option<Decimal>,
    /// `calculated_total - reference_total`, or the calculated total when
    /// there is no reference.
    pub variance: Decimal,
    /// The comparison outcome.
    pub status: ReconciliationStatus,
    /// Calculated regular hours (payrolled hours for salaried employees).
    pub calculated_regular_hours: Decimal,
    /// Calculated overtime hours.
    pub calculated_overtime_hours: Decimal,
    /// Regular hours from the reference export.
    pub reference_regular_hours: Option<Decimal>,
    /// Overtime hours from the reference export.
    pub reference_overtime_hours: Option<Decimal>,
    /// Whether regular and overtime hours agree within the hours tolerance.
    pub hours_match: Option<bool>,
}

/// Report-level reconciliation summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Number of reconciled employees.
    pub total_employees: usize,
    /// Employees within tolerance.
    pub ok_count: usize,
    /// Employees outside tolerance.
    pub mismatch_count: usize,
    /// Employees without a reference record.
    pub missing_reference_count: usize,
    /// Sum of calculated totals.
    pub total_calculated: Decimal,
    /// Sum of matched reference totals.
    pub total_reference: Decimal,
    /// `total_calculated - total_reference`.
    pub overall_variance: Decimal,
    /// Timesheet employees with no reference record.
    pub unmatched_employees: Vec<String>,
    /// Reference records with no timesheet employee.
    pub unmatched_references: Vec<String>,
    /// Results ordered mismatches first, then missing references, then ok,
    /// each group by employee name.
    pub results: Vec<ReconciliationResult>,
}
