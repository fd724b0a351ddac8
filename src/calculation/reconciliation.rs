//! Reconciliation against the reference payroll.
//!
//! Reconciliation is read-only validation: it reports the variance between
//! the calculated and reference totals and never adjusts calculated values.

use rust_decimal::Decimal;

use crate::config::ReconciliationConfig;
use crate::models::{
    ReconciliationResult, ReconciliationStatus, ReconciliationSummary, ReferencePayroll,
    WorkedTime,
};

/// Compares one employee's calculated total with their reference record.
///
/// # Arguments
///
/// * `employee` - The employee name
/// * `calculated_total` - Sum of the employee's rounded line items
/// * `regular_hours` - Calculated regular hours (payrolled hours for salaried)
/// * `overtime_hours` - Calculated overtime hours
/// * `reference` - The matched reference record, if any
/// * `config` - Currency and hours tolerances
///
/// # Examples
///
/// ```
/// use job_cost_engine::calculation::reconcile_employee;
/// use job_cost_engine::config::ReconciliationConfig;
/// use job_cost_engine::models::{ReconciliationStatus, WorkedTime};
/// use rust_decimal::Decimal;
///
/// let result = reconcile_employee(
///     "A",
///     Decimal::new(4075, 0),
///     WorkedTime::from_hours(40),
///     WorkedTime::from_minutes(30),
///     None,
///     &ReconciliationConfig::default(),
/// );
/// assert_eq!(result.status, ReconciliationStatus::MissingReference);
/// assert_eq!(result.variance, Decimal::new(4075, 0));
/// ```
pub fn reconcile_employee(
    employee: &str,
    calculated_total: Decimal,
    regular_hours: WorkedTime,
    overtime_hours: WorkedTime,
    reference: Option<&ReferencePayroll>,
    config: &ReconciliationConfig,
) -> ReconciliationResult {
    let calculated_regular_hours = regular_hours.hours();
    let calculated_overtime_hours = overtime_hours.hours();

    let Some(reference) = reference else {
        return ReconciliationResult {
            employee: employee.to_string(),
            calculated_total,
            reference_total: None,
            variance: calculated_total,
            status: ReconciliationStatus::MissingReference,
            calculated_regular_hours,
            calculated_overtime_hours,
            reference_regular_hours: None,
            reference_overtime_hours: None,
            hours_match: None,
        };
    };

    let variance = calculated_total - reference.gross_wages;
    let status = if variance.abs() <= config.tolerance {
        ReconciliationStatus::Ok
    } else {
        ReconciliationStatus::Mismatch
    };

    let hours_match = (calculated_regular_hours - reference.regular_hours).abs()
        <= config.hours_tolerance
        && (calculated_overtime_hours - reference.overtime_hours).abs() <= config.hours_tolerance;

    ReconciliationResult {
        employee: employee.to_string(),
        calculated_total,
        reference_total: Some(reference.gross_wages),
        variance,
        status,
        calculated_regular_hours,
        calculated_overtime_hours,
        reference_regular_hours: Some(reference.regular_hours),
        reference_overtime_hours: Some(reference.overtime_hours),
        hours_match: Some(hours_match),
    }
}

/// Builds the report-level reconciliation summary.
///
/// Results are ordered mismatches first, then missing references, then ok,
/// each group by employee name.
pub fn summarize_reconciliation(
    mut results: Vec<ReconciliationResult>,
    unmatched_employees: Vec<String>,
    unmatched_references: Vec<String>,
) -> ReconciliationSummary {
    results.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then_with(|| a.employee.cmp(&b.employee))
    });

    let count = |status: ReconciliationStatus| results.iter().filter(|r| r.status == status).count();
    let ok_count = count(ReconciliationStatus::Ok);
    let mismatch_count = count(ReconciliationStatus::Mismatch);
    let missing_reference_count = count(ReconciliationStatus::MissingReference);

    let total_calculated: Decimal = results.iter().map(|r| r.calculated_total).sum();
    let total_reference: Decimal = results.iter().filter_map(|r| r.reference_total).sum();

    ReconciliationSummary {
        total_employees: results.len(),
        ok_count,
        mismatch_count,
        missing_reference_count,
        total_calculated,
        total_reference,
        overall_variance: total_calculated - total_reference,
        unmatched_employees,
        unmatched_references,
        results,
    }
}
