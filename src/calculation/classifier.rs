//! Employee classification.
//!
//! This module resolves an employee's pay type and base rate from the roster.
//! Lookup is by exact name only: a near miss is an error, never a guess.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, PayType};
use crate::roster::Roster;

/// The result of classifying an employee, including the audit step.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Hourly or salaried.
    pub pay_type: PayType,
    /// The roster base rate.
    pub base_rate: Decimal,
    /// Whether the employee is an owner excluded from job costing.
    pub is_owner: bool,
    /// The roster alias used by the reference payroll export.
    pub reference_name: Option<String>,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Determines an employee's pay type and base rate.
///
/// # Arguments
///
/// * `name` - The employee name exactly as it appears in the timesheet
/// * `roster` - The roster to look the employee up in
/// * `step_number` - The step number for the audit trail
///
/// # Returns
///
/// Returns a [`ClassificationResult`], or `UnknownEmployee` if the roster
/// has no record with exactly this name.
///
/// # Examples
///
/// ```
/// use job_cost_engine::calculation::classify_employee;
/// use job_cost_engine::models::{Employee, PayType};
/// use job_cost_engine::roster::InMemoryRoster;
/// use rust_decimal::Decimal;
///
/// let roster = InMemoryRoster::new(vec![Employee {
///     name: "B".to_string(),
///     pay_type: PayType::Salaried,
///     base_rate: Decimal::new(6736, 2),
///     indirect_labor_code: String::new(),
///     direct_labor_code: String::new(),
///     reference_name: None,
///     is_owner: false,
/// }]);
///
/// let result = classify_employee("B", &roster, 1).unwrap();
/// assert_eq!(result.pay_type, PayType::Salaried);
/// assert_eq!(result.base_rate, Decimal::new(6736, 2));
///
/// assert!(classify_employee("b", &roster, 2).is_err());
/// ```
pub fn classify_employee(
    name: &str,
    roster: &dyn Roster,
    step_number: u32,
) -> EngineResult<ClassificationResult> {
    let employee = roster.get(name).ok_or_else(|| EngineError::UnknownEmployee {
        name: name.to_string(),
    })?;

    let pay_type_str = match employee.pay_type {
        PayType::Hourly => "hourly",
        PayType::Salaried => "salaried",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "employee_classification".to_string(),
        rule_name: "Employee Classification".to_string(),
        input: serde_json::json!({
            "employee": name,
        }),
        output: serde_json::json!({
            "pay_type": pay_type_str,
            "base_rate": employee.base_rate.to_string(),
            "is_owner": employee.is_owner,
        }),
        reasoning: if employee.is_owner {
            format!("'{}' is an owner and is excluded from job costing", name)
        } else {
            format!(
                "Roster lists '{}' as {} at ${}/hr",
                name, pay_type_str, employee.base_rate
            )
        },
    };

    Ok(ClassificationResult {
        pay_type: employee.pay_type,
        base_rate: employee.base_rate,
        is_owner: employee.is_owner,
        reference_name: employee.reference_name.clone(),
        audit_step,
    })
}
