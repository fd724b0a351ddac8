//! Weekly hours aggregation and overtime detection.
//!
//! ## Rules
//!
//! - Hourly employees earn overtime on hours above the weekly threshold
//!   (40 by default), counted separately for each week of the pay period.
//! - Salaried employees never earn overtime; hours above the standard period
//!   feed the salaried rate adjustment instead.

use std::collections::BTreeMap;

use crate::models::{
    AuditStep, OvertimeCandidate, OvertimeSituation, PayType, TimeEntry, WeeklyAggregate,
    WorkedTime,
};

/// The result of aggregating one employee's weekly hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyHoursResult {
    /// One aggregate per week with entries, in week order.
    pub weeks: Vec<WeeklyAggregate>,
    /// Audit steps recording each week's split.
    pub audit_steps: Vec<AuditStep>,
}

/// Splits an employee's hours into regular and overtime for each week.
///
/// # Arguments
///
/// * `employee` - The employee name
/// * `pay_type` - Hourly or salaried
/// * `entries` - The employee's entries for the whole pay period
/// * `threshold` - Weekly hours above which hourly time is overtime
/// * `step_number_start` - The starting step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use job_cost_engine::calculation::aggregate_weekly_hours;
/// use job_cost_engine::models::{PayType, TimeEntry, WorkedTime};
/// use chrono::NaiveDate;
///
/// let entry = |minutes| TimeEntry {
///     employee_name: "A".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     project: "Alpha".to_string(),
///     duration: WorkedTime::from_minutes(minutes),
///     is_billable: true,
///     week: 1,
///     source_row: 1,
/// };
/// let entries = vec![entry(30), entry(2400)];
///
/// let result = aggregate_weekly_hours("A", PayType::Hourly, &entries, WorkedTime::from_hours(40), 1);
/// assert_eq!(result.weeks[0].overtime, WorkedTime::from_minutes(30));
/// assert_eq!(result.weeks[0].regular, WorkedTime::from_hours(40));
/// ```
pub fn aggregate_weekly_hours(
    employee: &str,
    pay_type: PayType,
    entries: &[TimeEntry],
    threshold: WorkedTime,
    step_number_start: u32,
) -> WeeklyHoursResult {
    let mut totals: BTreeMap<u8, WorkedTime> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.week).or_default() += entry.duration;
    }

    let mut weeks = Vec::with_capacity(totals.len());
    let mut audit_steps = Vec::with_capacity(totals.len());

    for (step_offset, (week, total)) in totals.into_iter().enumerate() {
        let overtime = match pay_type {
            PayType::Hourly => total.saturating_sub(threshold),
            PayType::Salaried => WorkedTime::ZERO,
        };
        let regular = total.saturating_sub(overtime);

        let reasoning = match pay_type {
            PayType::Hourly if !overtime.is_zero() => format!(
                "Week {} total {}h exceeds {}h threshold: {}h regular, {}h overtime",
                week,
                total.hours().normalize(),
                threshold.hours().normalize(),
                regular.hours().normalize(),
                overtime.hours().normalize()
            ),
            PayType::Hourly => format!(
                "Week {} total {}h is within {}h threshold: all hours regular",
                week,
                total.hours().normalize(),
                threshold.hours().normalize()
            ),
            PayType::Salaried => format!(
                "Week {} total {}h: salaried employees do not earn overtime",
                week,
                total.hours().normalize()
            ),
        };

        audit_steps.push(AuditStep {
            step_number: step_number_start + step_offset as u32,
            rule_id: "weekly_hours".to_string(),
            rule_name: "Weekly Hours Aggregation".to_string(),
            input: serde_json::json!({
                "employee": employee,
                "week": week,
                "total": total.to_string(),
                "threshold": threshold.to_string(),
            }),
            output: serde_json::json!({
                "regular": regular.to_string(),
                "overtime": overtime.to_string(),
            }),
            reasoning,
        });

        weeks.push(WeeklyAggregate {
            employee: employee.to_string(),
            week,
            total,
            regular,
            overtime,
        });
    }

    WeeklyHoursResult { weeks, audit_steps }
}

/// Builds the overtime selection for a week, if it has overtime.
///
/// Every entry of the employee's week is a candidate, in source row order.
pub fn detect_overtime(
    aggregate: &WeeklyAggregate,
    entries: &[TimeEntry],
) -> Option<OvertimeSituation> {
    if !aggregate.has_overtime() {
        return None;
    }

    let mut week_entries: Vec<&TimeEntry> = entries
        .iter()
        .filter(|e| e.employee_name == aggregate.employee && e.week == aggregate.week)
        .collect();
    week_entries.sort_by_key(|e| e.source_row);

    Some(OvertimeSituation {
        employee: aggregate.employee.clone(),
        week: aggregate.week,
        total_hours: aggregate.total,
        overtime_hours: aggregate.overtime,
        candidates: week_entries
            .into_iter()
            .map(|e| OvertimeCandidate {
                entry_key: e.key(),
                date: e.date,
                project: e.project.clone(),
                hours: e.duration,
            })
            .collect(),
    })
}
