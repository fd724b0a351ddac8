//! Calculation logic for the Job Cost Allocation Engine.
//!
//! This module contains the calculation functions for job costing: employee
//! classification against the roster, weekly hours aggregation and overtime
//! detection, allocation of overtime to a chosen target entry, the salaried
//! rate adjustment with exact-sum distribution, line item costing, and
//! reconciliation against a reference payroll.
//!
//! Every step returns its result together with the audit steps recording
//! how it was reached.

mod classifier;
mod line_costs;
mod overtime_allocation;
mod reconciliation;
mod rounding;
mod salaried_adjustment;
mod weekly_hours;

pub use classifier::{ClassificationResult, classify_employee};
pub use line_costs::{EmployeeCostResult, calculate_line_costs};
pub use overtime_allocation::{EntryAllocation, OvertimeAllocationResult, allocate_overtime};
pub use reconciliation::{reconcile_employee, summarize_reconciliation};
pub use rounding::round_cents;
pub use salaried_adjustment::{
    SalariedAdjustment, calculate_salaried_adjustment, distribute_fixed_total,
};
pub use weekly_hours::{WeeklyHoursResult, aggregate_weekly_hours, detect_overtime};
