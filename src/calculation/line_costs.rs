//! Line item costing.
//!
//! Groups an employee's allocated entries by project and costs each group.
//!
//! ## Rules
//!
//! - Regular cost is `regular_hours × base_rate`.
//! - Overtime cost is `overtime_hours × base_rate × overtime_multiplier`.
//! - A salaried employee over the standard period hours is costed at the
//!   adjusted rate instead, and their line items sum exactly to the period
//!   salary (see [`super::distribute_fixed_total`]).
//! - Each line's regular and overtime cost is rounded half-up to cents.
//!   Per-entry contributions keep the unrounded amounts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::RulesConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, EntryContribution, LineItemCost, PayType, RateKind, WorkedTime};

use super::{
    EntryAllocation, SalariedAdjustment, calculate_salaried_adjustment, distribute_fixed_total,
    round_cents,
};

/// The costed result for one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeCostResult {
    /// One line item per project, in project name order.
    pub line_items: Vec<LineItemCost>,
    /// One contribution per allocated entry, in allocation order.
    pub contributions: Vec<EntryContribution>,
    /// The salaried adjustment, when one applied.
    pub adjustment: Option<SalariedAdjustment>,
    /// `base_rate × overtime_multiplier`.
    pub overtime_rate: Decimal,
    /// Audit steps recording the adjustment and the costing.
    pub audit_steps: Vec<AuditStep>,
}

impl EmployeeCostResult {
    /// Returns the sum of the employee's rounded line items.
    pub fn total_cost(&self) -> Decimal {
        self.line_items.iter().map(|line| line.total_cost).sum()
    }
}

#[derive(Default)]
struct ProjectHours {
    regular: WorkedTime,
    overtime: WorkedTime,
}

/// Costs an employee's allocated entries.
///
/// # Arguments
///
/// * `employee` - The employee name
/// * `pay_type` - Hourly or salaried
/// * `base_rate` - The roster base rate
/// * `allocations` - The employee's entries with regular/overtime split
/// * `rules` - The standard period hours and overtime multiplier
/// * `step_number_start` - The starting step number for audit trail sequencing
///
/// # Errors
///
/// Returns `CalculationError` if an adjustment has to be spread over zero hours.
pub fn calculate_line_costs(
    employee: &str,
    pay_type: PayType,
    base_rate: Decimal,
    allocations: &[EntryAllocation],
    rules: &RulesConfig,
    step_number_start: u32,
) -> EngineResult<EmployeeCostResult> {
    let mut step_number = step_number_start;
    let mut audit_steps = Vec::new();

    let actual_hours: WorkedTime = allocations.iter().map(|a| a.entry.duration).sum();
    let overtime_rate = base_rate * rules.overtime_multiplier;

    let adjustment = match pay_type {
        PayType::Salaried => calculate_salaried_adjustment(
            base_rate,
            actual_hours,
            rules.standard_period(),
            step_number,
        ),
        PayType::Hourly => None,
    };
    if let Some(adjustment) = &adjustment {
        audit_steps.push(adjustment.audit_step.clone());
        step_number += 1;
    }

    let mut by_project: BTreeMap<&str, ProjectHours> = BTreeMap::new();
    for allocation in allocations {
        let hours = by_project
            .entry(allocation.entry.project.as_str())
            .or_default();
        hours.regular += allocation.regular;
        hours.overtime += allocation.overtime;
    }

    let (rate, rate_kind) = match &adjustment {
        Some(adjustment) => (adjustment.adjusted_rate, RateKind::Adjusted),
        None => (base_rate, RateKind::Base),
    };

    let regular_costs: Vec<Decimal> = match &adjustment {
        Some(adjustment) => {
            let lines: Vec<WorkedTime> = by_project.values().map(|h| h.regular).collect();
            distribute_fixed_total(adjustment.target_total, &lines, actual_hours)?
        }
        None => by_project
            .values()
            .map(|h| round_cents(h.regular.cost_at(base_rate)))
            .collect(),
    };

    let line_items: Vec<LineItemCost> = by_project
        .iter()
        .zip(regular_costs)
        .map(|((project, hours), regular_cost)| {
            let overtime_cost = round_cents(hours.overtime.cost_at(overtime_rate));
            LineItemCost {
                employee: employee.to_string(),
                project: project.to_string(),
                regular_hours: hours.regular,
                overtime_hours: hours.overtime,
                rate,
                overtime_rate,
                regular_cost,
                overtime_cost,
                total_cost: regular_cost + overtime_cost,
                rate_kind,
            }
        })
        .collect();

    let contributions = allocations
        .iter()
        .map(|allocation| EntryContribution {
            entry_key: allocation.entry.key(),
            employee: employee.to_string(),
            week: allocation.entry.week,
            date: allocation.entry.date,
            project: allocation.entry.project.clone(),
            is_billable: allocation.entry.is_billable,
            regular_hours: allocation.regular,
            overtime_hours: allocation.overtime,
            rate,
            regular_cost: allocation.regular.cost_at(rate),
            overtime_cost: allocation.overtime.cost_at(overtime_rate),
        })
        .collect();

    let total_cost: Decimal = line_items.iter().map(|line| line.total_cost).sum();
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "line_costs".to_string(),
        rule_name: "Line Item Costing".to_string(),
        input: serde_json::json!({
            "employee": employee,
            "actual_hours": actual_hours.to_string(),
            "rate": rate.to_string(),
            "overtime_rate": overtime_rate.to_string(),
        }),
        output: serde_json::json!({
            "line_items": line_items
                .iter()
                .map(|line| serde_json::json!({
                    "project": line.project,
                    "regular_hours": line.regular_hours.to_string(),
                    "overtime_hours": line.overtime_hours.to_string(),
                    "total_cost": line.total_cost.to_string(),
                }))
                .collect::<Vec<_>>(),
            "total_cost": total_cost.to_string(),
        }),
        reasoning: format!(
            "{} project line(s) costed at {} rate ${}/hr: total ${}",
            line_items.len(),
            match rate_kind {
                RateKind::Base => "base",
                RateKind::Adjusted => "adjusted",
            },
            rate.round_dp(4),
            total_cost
        ),
    });

    Ok(EmployeeCostResult {
        line_items,
        contributions,
        adjustment,
        overtime_rate,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeEntry;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn allocation(project: &str, regular: u32, overtime: u32, row: usize) -> EntryAllocation {
        EntryAllocation {
            entry: TimeEntry {
                employee_name: "A".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                project: project.to_string(),
                duration: WorkedTime::from_minutes(regular + overtime),
                is_billable: true,
                week: 1,
                source_row: row,
            },
            regular: WorkedTime::from_minutes(regular),
            overtime: WorkedTime::from_minutes(overtime),
        }
    }

    // ==========================================================================
    // Hourly costing
    // ==========================================================================

    #[test]
    fn test_hourly_overtime_target_costs_75() {
        let allocations = vec![allocation("Alpha", 0, 30, 1), allocation("Beta", 2400, 0, 2)];
        let result = calculate_line_costs(
            "A",
            PayType::Hourly,
            dec("100"),
            &allocations,
            &RulesConfig::default(),
            1,
        )
        .unwrap();

        assert_eq!(result.line_items.len(), 2);
        let alpha = &result.line_items[0];
        assert_eq!(alpha.project, "Alpha");
        assert_eq!(alpha.regular_hours, WorkedTime::ZERO);
        assert_eq!(alpha.overtime_hours, WorkedTime::from_minutes(30));
        assert_eq!(alpha.overtime_rate, dec("150"));
        assert_eq!(alpha.total_cost, dec("75"));

        let beta = &result.line_items[1];
        assert_eq!(beta.total_cost, dec("4000"));
        assert_eq!(beta.rate_kind, RateKind::Base);

        assert_eq!(result.total_cost(), dec("4075"));
        assert!(result.adjustment.is_none());
    }

    #[test]
    fn test_entries_group_by_project_in_name_order() {
        let allocations = vec![
            allocation("Zeta", 60, 0, 1),
            allocation("Alpha", 90, 0, 2),
            allocation("Zeta", 30, 0, 3),
        ];
        let result = calculate_line_costs(
            "A",
            PayType::Hourly,
            dec("37.26"),
            &allocations,
            &RulesConfig::default(),
            1,
        )
        .unwrap();

        let projects: Vec<&str> = result.line_items.iter().map(|l| l.project.as_str()).collect();
        assert_eq!(projects, vec!["Alpha", "Zeta"]);
        assert_eq!(result.line_items[0].total_cost, dec("55.89"));
        assert_eq!(result.line_items[1].regular_hours, WorkedTime::from_minutes(90));
        assert_eq!(result.line_items[1].total_cost, dec("55.89"));
        assert_eq!(result.contributions.len(), 3);
    }

    #[test]
    fn test_line_costs_round_to_cents_but_contributions_do_not() {
        // 7 minutes at 37.26 = 4.347
        let allocations = vec![allocation("Alpha", 7, 0, 1)];
        let result = calculate_line_costs(
            "A",
            PayType::Hourly,
            dec("37.26"),
            &allocations,
            &RulesConfig::default(),
            1,
        )
        .unwrap();

        assert_eq!(result.line_items[0].total_cost, dec("4.35"));
        assert_eq!(result.contributions[0].regular_cost, dec("4.347"));
    }

    // ==========================================================================
    // Salaried costing
    // ==========================================================================

    #[test]
    fn test_salaried_over_standard_hours_sums_to_salary() {
        let allocations = vec![
            allocation("Alpha", 1800, 0, 1),
            allocation("Beta", 1800, 0, 2),
            allocation("Gamma", 2100, 0, 3),
        ];
        let result = calculate_line_costs(
            "B",
            PayType::Salaried,
            dec("67.36"),
            &allocations,
            &RulesConfig::default(),
            5,
        )
        .unwrap();

        let costs: Vec<Decimal> = result.line_items.iter().map(|l| l.total_cost).collect();
        assert_eq!(costs, vec![dec("1701.73"), dec("1701.73"), dec("1985.34")]);
        assert_eq!(result.total_cost(), dec("5388.80"));
        assert!(result.line_items.iter().all(|l| l.rate_kind == RateKind::Adjusted));
        assert_eq!(result.line_items[0].rate.round_dp(4), dec("56.7242"));

        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].rule_id, "salaried_adjustment");
        assert_eq!(result.audit_steps[0].step_number, 5);
        assert_eq!(result.audit_steps[1].step_number, 6);
    }

    #[test]
    fn test_salaried_remainder_skips_trailing_zero_hour_project() {
        let allocations = vec![
            allocation("Alpha", 1800, 0, 1),
            allocation("Beta", 1800, 0, 2),
            allocation("Gamma", 2100, 0, 3),
            allocation("Zulu", 0, 0, 4),
        ];
        let result = calculate_line_costs(
            "B",
            PayType::Salaried,
            dec("67.36"),
            &allocations,
            &RulesConfig::default(),
            1,
        )
        .unwrap();

        let costs: Vec<Decimal> = result.line_items.iter().map(|l| l.total_cost).collect();
        assert_eq!(
            costs,
            vec![dec("1701.73"), dec("1701.73"), dec("1985.34"), Decimal::ZERO]
        );
        assert_eq!(result.total_cost(), dec("5388.80"));
    }

    #[test]
    fn test_salaried_at_standard_hours_uses_base_rate() {
        let allocations = vec![allocation("Alpha", 2400, 0, 1), allocation("Beta", 2400, 0, 2)];
        let result = calculate_line_costs(
            "B",
            PayType::Salaried,
            dec("67.36"),
            &allocations,
            &RulesConfig::default(),
            1,
        )
        .unwrap();

        assert!(result.adjustment.is_none());
        assert_eq!(result.line_items[0].rate_kind, RateKind::Base);
        assert_eq!(result.total_cost(), dec("5388.80"));
    }
}
