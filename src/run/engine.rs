//! The two-phase run orchestrator.
//!
//! Phase 1 ([`JobCostEngine::prepare`]) classifies every timesheet employee,
//! aggregates weekly hours and lists the weeks whose overtime needs a target
//! entry. Phase 2 ([`JobCostEngine::complete`]) takes one decision per such
//! week, allocates and costs every employee, and reconciles the result.
//!
//! An error for one employee excludes only that employee; it is recorded as
//! an [`EmployeeFailure`] and the rest of the run continues.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    aggregate_weekly_hours, allocate_overtime, calculate_line_costs, classify_employee,
    detect_overtime, reconcile_employee, summarize_reconciliation,
};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, EmployeeFailure, EmployeeSummary, EntryContribution,
    JobCostReport, LineItemCost, OvertimeDecisions, PayPeriod, PayType, ReconciliationStatus,
    ReferencePayroll, TimeEntry, WorkedTime,
};
use crate::parsing::{ParsedTimesheet, match_references};
use crate::roster::Roster;

use super::{PreparedEmployee, RunContext};

/// Runs job costing against a roster and configuration.
///
/// # Example
///
/// ```
/// use job_cost_engine::config::EngineConfig;
/// use job_cost_engine::models::OvertimeDecisions;
/// use job_cost_engine::parsing::ParsedTimesheet;
/// use job_cost_engine::roster::InMemoryRoster;
/// use job_cost_engine::run::JobCostEngine;
///
/// let roster = InMemoryRoster::default();
/// let config = EngineConfig::default();
/// let engine = JobCostEngine::new(&roster, &config);
///
/// let context = engine.prepare(ParsedTimesheet::default());
/// assert!(!context.requires_overtime_selection());
///
/// let report = engine.complete(&context, &OvertimeDecisions::new(), None);
/// assert!(report.line_items.is_empty());
/// ```
pub struct JobCostEngine<'a> {
    roster: &'a dyn Roster,
    config: &'a EngineConfig,
}

struct CostedEmployee {
    summary: EmployeeSummary,
    line_items: Vec<LineItemCost>,
    contributions: Vec<EntryContribution>,
    audit_steps: Vec<AuditStep>,
}

impl<'a> JobCostEngine<'a> {
    /// Creates an engine over a roster and configuration.
    pub fn new(roster: &'a dyn Roster, config: &'a EngineConfig) -> Self {
        Self { roster, config }
    }

    /// Phase 1: classifies employees and detects overtime.
    pub fn prepare(&self, parsed: ParsedTimesheet) -> RunContext {
        let run_id = Uuid::new_v4();
        let pay_period = PayPeriod::spanning(&parsed.entries);

        let mut by_employee: BTreeMap<String, Vec<TimeEntry>> = BTreeMap::new();
        for entry in parsed.entries {
            by_employee
                .entry(entry.employee_name.clone())
                .or_default()
                .push(entry);
        }

        let threshold = self.config.rules.weekly_threshold();
        let mut step_number: u32 = 1;
        let mut audit_steps = Vec::new();
        let mut employees = Vec::new();
        let mut failures = Vec::new();
        let mut excluded_owners = Vec::new();
        let mut overtime_situations = Vec::new();

        for (name, entries) in by_employee {
            let classification = match classify_employee(&name, self.roster, step_number) {
                Ok(classification) => classification,
                Err(err) => {
                    warn!(run_id = %run_id, employee = %name, error = %err, "Employee excluded");
                    failures.push(EmployeeFailure::new(&name, &err));
                    continue;
                }
            };
            audit_steps.push(classification.audit_step);
            step_number += 1;

            if classification.is_owner {
                info!(run_id = %run_id, employee = %name, "Owner excluded from job costing");
                excluded_owners.push(name);
                continue;
            }

            let weekly = aggregate_weekly_hours(
                &name,
                classification.pay_type,
                &entries,
                threshold,
                step_number,
            );
            step_number += weekly.audit_steps.len() as u32;
            audit_steps.extend(weekly.audit_steps);

            for week in &weekly.weeks {
                if let Some(situation) = detect_overtime(week, &entries) {
                    debug!(
                        run_id = %run_id,
                        employee = %name,
                        week = week.week,
                        overtime = %week.overtime,
                        "Overtime detected"
                    );
                    overtime_situations.push(situation);
                }
            }

            employees.push(PreparedEmployee {
                name,
                pay_type: classification.pay_type,
                base_rate: classification.base_rate,
                reference_name: classification.reference_name,
                entries,
                weeks: weekly.weeks,
            });
        }

        info!(
            run_id = %run_id,
            employees = employees.len(),
            failures = failures.len(),
            parse_issues = parsed.issues.len(),
            overtime_weeks = overtime_situations.len(),
            "Run prepared"
        );

        RunContext {
            run_id,
            created_at: Utc::now(),
            pay_period,
            employees,
            parse_issues: parsed.issues,
            failures,
            excluded_owners,
            overtime_situations,
            audit_steps,
        }
    }

    /// Phase 2: allocates overtime, costs every employee and reconciles.
    ///
    /// Reconciliation runs only when `references` is supplied.
    pub fn complete(
        &self,
        context: &RunContext,
        decisions: &OvertimeDecisions,
        references: Option<&[ReferencePayroll]>,
    ) -> JobCostReport {
        let start_time = Instant::now();
        let run_id = context.run_id;

        let mut steps = context.audit_steps.clone();
        let mut warnings = Vec::new();
        let mut failures = context.failures.clone();
        let mut line_items: Vec<LineItemCost> = Vec::new();
        let mut entries = Vec::new();
        let mut employees: Vec<EmployeeSummary> = Vec::new();

        for prepared in &context.employees {
            let step_number = steps.len() as u32 + 1;
            match self.cost_employee(prepared, decisions, step_number) {
                Ok(costed) => {
                    steps.extend(costed.audit_steps);
                    line_items.extend(costed.line_items);
                    entries.extend(costed.contributions);
                    employees.push(costed.summary);
                }
                Err(err) => {
                    warn!(
                        run_id = %run_id,
                        employee = %prepared.name,
                        error = %err,
                        "Employee excluded"
                    );
                    failures.push(EmployeeFailure::new(&prepared.name, &err));
                }
            }
        }

        for failure in &failures {
            warnings.push(AuditWarning {
                code: "EMPLOYEE_EXCLUDED".to_string(),
                message: format!("{}: {}", failure.employee, failure.message),
                severity: "high".to_string(),
            });
        }

        let reconciliation = references.map(|references| {
            let aliases: BTreeMap<&str, Option<&str>> = context
                .employees
                .iter()
                .map(|e| (e.name.as_str(), e.reference_name.as_deref()))
                .collect();
            let matched = match_references(
                employees.iter().map(|summary| {
                    let name = summary.employee.as_str();
                    (name, aliases.get(name).copied().flatten())
                }),
                references,
            );

            let mut results = Vec::with_capacity(employees.len());
            for summary in &mut employees {
                let result = reconcile_employee(
                    &summary.employee,
                    summary.total_cost,
                    summary.payrolled_hours.saturating_sub(summary.overtime_hours),
                    summary.overtime_hours,
                    matched.matched.get(&summary.employee),
                    &self.config.reconciliation,
                );
                if result.status == ReconciliationStatus::Mismatch {
                    warn!(
                        run_id = %run_id,
                        employee = %summary.employee,
                        variance = %result.variance,
                        "Reconciliation mismatch"
                    );
                }
                if result.hours_match == Some(false) {
                    warnings.push(AuditWarning {
                        code: "HOURS_MISMATCH".to_string(),
                        message: format!(
                            "{}: calculated hours differ from the reference payroll",
                            summary.employee
                        ),
                        severity: "medium".to_string(),
                    });
                }
                summary.reconciliation = Some(result.clone());
                results.push(result);
            }

            summarize_reconciliation(
                results,
                matched.unmatched_employees,
                matched.unmatched_references,
            )
        });

        line_items.sort_by(|a, b| {
            a.employee
                .cmp(&b.employee)
                .then_with(|| a.project.cmp(&b.project))
        });

        let duration_us = start_time.elapsed().as_micros() as u64;
        let total_cost: Decimal = line_items.iter().map(|line| line.total_cost).sum();
        info!(
            run_id = %run_id,
            employees = employees.len(),
            failures = failures.len(),
            total_cost = %total_cost,
            duration_us = duration_us,
            "Run completed"
        );

        JobCostReport {
            run_id,
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            pay_period: context.pay_period.clone(),
            overtime_multiplier: self.config.rules.overtime_multiplier,
            line_items,
            employees,
            entries,
            failures,
            parse_issues: context.parse_issues.clone(),
            excluded_owners: context.excluded_owners.clone(),
            reconciliation,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us,
            },
        }
    }

    fn cost_employee(
        &self,
        prepared: &PreparedEmployee,
        decisions: &OvertimeDecisions,
        step_number: u32,
    ) -> EngineResult<CostedEmployee> {
        let allocation = allocate_overtime(
            &prepared.name,
            &prepared.entries,
            &prepared.weeks,
            decisions,
            step_number,
        )?;
        let mut audit_steps = allocation.audit_steps;

        let costs = calculate_line_costs(
            &prepared.name,
            prepared.pay_type,
            prepared.base_rate,
            &allocation.allocations,
            &self.config.rules,
            step_number + audit_steps.len() as u32,
        )?;
        audit_steps.extend(costs.audit_steps.iter().cloned());

        let total_hours: WorkedTime = prepared.weeks.iter().map(|w| w.total).sum();
        let regular_hours: WorkedTime = prepared.weeks.iter().map(|w| w.regular).sum();
        let overtime_hours: WorkedTime = prepared.weeks.iter().map(|w| w.overtime).sum();
        let payrolled_hours = match prepared.pay_type {
            PayType::Salaried => total_hours.min(self.config.rules.standard_period()),
            PayType::Hourly => total_hours,
        };

        let summary = EmployeeSummary {
            employee: prepared.name.clone(),
            pay_type: prepared.pay_type,
            total_hours,
            payrolled_hours,
            regular_hours,
            overtime_hours,
            base_rate: prepared.base_rate,
            adjusted_rate: costs.adjustment.as_ref().map(|a| a.adjusted_rate),
            overtime_rate: (!overtime_hours.is_zero()).then_some(costs.overtime_rate),
            total_cost: costs.total_cost(),
            weeks: prepared.weeks.clone(),
            reconciliation: None,
        };

        Ok(CostedEmployee {
            summary,
            line_items: costs.line_items,
            contributions: costs.contributions,
            audit_steps,
        })
    }
}
