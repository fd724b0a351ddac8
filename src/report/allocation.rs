//! CSV job-cost allocation layout.
//!
//! For each employee, in name order:
//!
//! - per project, a regular-hours row (rate type `Base` or `Adjusted`) and,
//!   when the project carries overtime, an overtime row (`OT 1.5x`)
//! - a `Calculated:` / `Reference:` row with the employee total
//! - a `Difference:` row with the reconciliation status
//! - a blank separator row

use std::io::Write;

use rust_decimal::Decimal;

use crate::calculation::round_cents;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeSummary, JobCostReport, RateKind, ReconciliationStatus};

/// Column headers of the allocation CSV.
pub const ALLOCATION_HEADERS: [&str; 7] = [
    "Employee Name",
    "Project/Job Code",
    "Hours",
    "Rate",
    "Amount",
    "Rate Type",
    "Notes",
];

/// Writes the allocation layout of a report as CSV.
///
/// # Errors
///
/// Returns `OutputError` if the writer fails.
pub fn write_allocation_csv<W: Write>(report: &JobCostReport, writer: W) -> EngineResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(ALLOCATION_HEADERS)
        .map_err(output_error)?;

    let overtime_label = format!("OT {}x", report.overtime_multiplier.normalize());

    for summary in &report.employees {
        for row in employee_rows(report, summary, &overtime_label) {
            csv_writer.write_record(&row).map_err(output_error)?;
        }
    }

    csv_writer.flush().map_err(output_error)?;
    Ok(())
}

fn employee_rows(
    report: &JobCostReport,
    summary: &EmployeeSummary,
    overtime_label: &str,
) -> Vec<[String; 7]> {
    let name = summary.employee.as_str();
    let mut rows = Vec::new();
    let mut first_regular = true;

    for line in report.line_items_for(name) {
        if !line.regular_hours.is_zero() || !line.regular_cost.is_zero() {
            let (rate, rate_type) = match line.rate_kind {
                RateKind::Adjusted => (format!("{:.6}", line.rate.round_dp(6)), "Adjusted"),
                RateKind::Base => (money(line.rate), "Base"),
            };
            let note = if first_regular && line.rate_kind == RateKind::Adjusted {
                format!("{:.1}hrs total", summary.total_hours.hours().round_dp(1))
            } else {
                String::new()
            };
            first_regular = false;

            rows.push([
                name.to_string(),
                line.project.clone(),
                hours(line.regular_hours.hours()),
                rate,
                money(line.regular_cost),
                rate_type.to_string(),
                note,
            ]);
        }

        if !line.overtime_hours.is_zero() {
            rows.push([
                name.to_string(),
                line.project.clone(),
                hours(line.overtime_hours.hours()),
                money(line.overtime_rate),
                money(line.overtime_cost),
                overtime_label.to_string(),
                "Overtime".to_string(),
            ]);
        }
    }

    let reconciliation = summary.reconciliation.as_ref();
    let reference = reconciliation
        .and_then(|result| result.reference_total)
        .map(money)
        .unwrap_or_else(|| "N/A".to_string());
    let (variance, status) = match reconciliation {
        Some(result) => (result.variance, result.status),
        None => (summary.total_cost, ReconciliationStatus::MissingReference),
    };

    rows.push([
        name.to_string(),
        String::new(),
        String::new(),
        "Calculated:".to_string(),
        money(summary.total_cost),
        "Reference:".to_string(),
        reference,
    ]);
    rows.push([
        String::new(),
        String::new(),
        String::new(),
        "Difference:".to_string(),
        money(variance),
        String::new(),
        status.label().to_string(),
    ]);
    rows.push(Default::default());

    rows
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

fn hours(hours: Decimal) -> String {
    format!("{:.2}", hours.round_dp(2))
}

fn output_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::OutputError {
        message: err.to_string(),
    }
}
