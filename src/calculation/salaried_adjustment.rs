//! Salaried rate adjustment.
//!
//! A salaried employee is paid the same amount however many hours they work.
//! When they work more than the standard period hours (80 by default), job
//! costing spreads that fixed salary over the actual hours at an adjusted
//! rate, so each project carries its true share of the salary.
//!
//! ## Calculation
//!
//! - `target = round_cents(base_rate × standard_hours)`
//! - `adjusted_rate = target / actual_hours`
//! - each line is `round_cents(line_hours × adjusted_rate)`, except the last,
//!   which is `target - sum(previous lines)` so the lines sum exactly to the
//!   target

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, WorkedTime};

use super::round_cents;

/// The adjusted rate for a salaried employee over the standard hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalariedAdjustment {
    /// The roster base rate.
    pub base_rate: Decimal,
    /// Hours worked over the pay period.
    pub actual_hours: WorkedTime,
    /// Hours the salary covers.
    pub standard_hours: WorkedTime,
    /// The period salary, `base_rate × standard_hours` rounded to cents.
    pub target_total: Decimal,
    /// `target_total / actual_hours`, unrounded.
    pub adjusted_rate: Decimal,
    /// The audit step recording the adjustment.
    pub audit_step: AuditStep,
}

/// Calculates the salaried rate adjustment.
///
/// Returns `None` when `actual_hours` does not exceed `standard_hours`; those
/// employees are costed at their base rate.
///
/// # Examples
///
/// ```
/// use job_cost_engine::calculation::calculate_salaried_adjustment;
/// use job_cost_engine::models::WorkedTime;
/// use rust_decimal::Decimal;
///
/// let adjustment = calculate_salaried_adjustment(
///     Decimal::new(6736, 2),
///     WorkedTime::from_hours(95),
///     WorkedTime::from_hours(80),
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(adjustment.target_total, Decimal::new(538880, 2));
/// assert_eq!(adjustment.adjusted_rate.round_dp(4), Decimal::new(567242, 4));
/// ```
pub fn calculate_salaried_adjustment(
    base_rate: Decimal,
    actual_hours: WorkedTime,
    standard_hours: WorkedTime,
    step_number: u32,
) -> Option<SalariedAdjustment> {
    if actual_hours <= standard_hours {
        return None;
    }

    let target_total = round_cents(standard_hours.cost_at(base_rate));
    // Divide by minutes so fractional hours do not introduce a rounded divisor.
    let adjusted_rate =
        target_total * Decimal::from(60) / Decimal::from(actual_hours.minutes());

    let audit_step = AuditStep {
        step_number,
        rule_id: "salaried_adjustment".to_string(),
        rule_name: "Salaried Rate Adjustment".to_string(),
        input: serde_json::json!({
            "base_rate": base_rate.to_string(),
            "actual_hours": actual_hours.to_string(),
            "standard_hours": standard_hours.to_string(),
        }),
        output: serde_json::json!({
            "target_total": target_total.to_string(),
            "adjusted_rate": adjusted_rate.to_string(),
        }),
        reasoning: format!(
            "Salary of ${} ({}h × ${}) spread over {}h worked: adjusted rate ${}/hr",
            target_total,
            standard_hours.hours().normalize(),
            base_rate,
            actual_hours.hours().normalize(),
            adjusted_rate.round_dp(4)
        ),
    };

    Some(SalariedAdjustment {
        base_rate,
        actual_hours,
        standard_hours,
        target_total,
        adjusted_rate,
        audit_step,
    })
}

/// Splits a fixed total across lines in proportion to their hours.
///
/// Every line but the last one with hours is rounded half-up to cents; that
/// line takes the remainder, so the result sums exactly to `target`. Lines
/// with zero hours get zero. The lines' hours must sum to `total_hours`.
///
/// # Errors
///
/// Returns `CalculationError` if `total_hours` is zero or no line has hours.
///
/// # Examples
///
/// ```
/// use job_cost_engine::calculation::distribute_fixed_total;
/// use job_cost_engine::models::WorkedTime;
/// use rust_decimal::Decimal;
///
/// let lines = [WorkedTime::from_hours(30), WorkedTime::from_hours(30), WorkedTime::from_hours(35)];
/// let amounts = distribute_fixed_total(Decimal::new(538880, 2), &lines, WorkedTime::from_hours(95)).unwrap();
///
/// assert_eq!(amounts, vec![Decimal::new(170173, 2), Decimal::new(170173, 2), Decimal::new(198534, 2)]);
/// assert_eq!(amounts.iter().sum::<Decimal>(), Decimal::new(538880, 2));
/// ```
pub fn distribute_fixed_total(
    target: Decimal,
    lines: &[WorkedTime],
    total_hours: WorkedTime,
) -> EngineResult<Vec<Decimal>> {
    let last = lines
        .iter()
        .rposition(|hours| !hours.is_zero())
        .filter(|_| !total_hours.is_zero());
    let Some(last) = last else {
        return Err(EngineError::CalculationError {
            message: "cannot distribute a fixed total over zero hours".to_string(),
        });
    };

    let total_minutes = Decimal::from(total_hours.minutes());
    let mut allocated = Decimal::ZERO;
    let mut amounts = Vec::with_capacity(lines.len());

    for (index, hours) in lines.iter().enumerate() {
        if index == last {
            amounts.push(Decimal::ZERO);
            continue;
        }
        let amount = round_cents(target * Decimal::from(hours.minutes()) / total_minutes);
        allocated += amount;
        amounts.push(amount);
    }
    amounts[last] = target - allocated;

    Ok(amounts)
}
