//! Overtime allocation to a chosen target entry.
//!
//! A week's overtime is booked against a single project chosen by a person
//! reviewing the run. The chosen entry absorbs the overtime first; if it is
//! shorter than the overtime, the rest is taken from the same project's other
//! entries that week in row order. All other entries stay fully regular.

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, OvertimeDecisions, TimeEntry, WeeklyAggregate, WorkedTime};

/// One entry's share of regular and overtime hours after allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryAllocation {
    /// The allocated entry.
    pub entry: TimeEntry,
    /// Hours paid at the regular rate.
    pub regular: WorkedTime,
    /// Hours paid at the overtime rate.
    pub overtime: WorkedTime,
}

/// The result of allocating an employee's overtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeAllocationResult {
    /// One allocation per entry, in input order.
    pub allocations: Vec<EntryAllocation>,
    /// Audit steps recording each week's allocation.
    pub audit_steps: Vec<AuditStep>,
}

/// Allocates each overtime week's hours to the decided target entry.
///
/// # Arguments
///
/// * `employee` - The employee name
/// * `entries` - The employee's entries for the whole pay period
/// * `weeks` - The employee's weekly aggregates
/// * `decisions` - The chosen target entry per employee week
/// * `step_number_start` - The starting step number for audit trail sequencing
///
/// # Errors
///
/// * `MissingOvertimeDecision` - a week has overtime but no decision
/// * `InvalidOvertimeDecision` - the decided key is not one of the week's
///   entries, or the target project worked fewer hours that week than the
///   overtime being allocated
///
/// # Examples
///
/// ```
/// use job_cost_engine::calculation::{aggregate_weekly_hours, allocate_overtime};
/// use job_cost_engine::models::{OvertimeDecision, OvertimeDecisions, PayType, TimeEntry, WorkedTime};
/// use chrono::NaiveDate;
///
/// let entry = |project: &str, minutes, row| TimeEntry {
///     employee_name: "A".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     project: project.to_string(),
///     duration: WorkedTime::from_minutes(minutes),
///     is_billable: true,
///     week: 1,
///     source_row: row,
/// };
/// let entries = vec![entry("Alpha", 30, 1), entry("Beta", 2400, 2)];
/// let weeks = aggregate_weekly_hours("A", PayType::Hourly, &entries, WorkedTime::from_hours(40), 1).weeks;
///
/// let decisions: OvertimeDecisions = vec![OvertimeDecision {
///     employee: "A".to_string(),
///     week: 1,
///     entry_key: entries[0].key(),
/// }]
/// .into_iter()
/// .collect();
///
/// let result = allocate_overtime("A", &entries, &weeks, &decisions, 1).unwrap();
/// assert_eq!(result.allocations[0].overtime, WorkedTime::from_minutes(30));
/// assert_eq!(result.allocations[0].regular, WorkedTime::ZERO);
/// assert_eq!(result.allocations[1].regular, WorkedTime::from_hours(40));
/// ```
pub fn allocate_overtime(
    employee: &str,
    entries: &[TimeEntry],
    weeks: &[WeeklyAggregate],
    decisions: &OvertimeDecisions,
    step_number_start: u32,
) -> EngineResult<OvertimeAllocationResult> {
    let mut overtime_by_entry = vec![WorkedTime::ZERO; entries.len()];
    let mut audit_steps = Vec::new();
    let mut step_number = step_number_start;

    for week in weeks.iter().filter(|w| w.has_overtime()) {
        let decision = decisions.get(employee, week.week).ok_or_else(|| {
            EngineError::MissingOvertimeDecision {
                employee: employee.to_string(),
                week: week.week,
            }
        })?;

        let invalid = |message: String| EngineError::InvalidOvertimeDecision {
            employee: employee.to_string(),
            week: week.week,
            message,
        };

        let mut week_indices: Vec<usize> = (0..entries.len())
            .filter(|&i| entries[i].week == week.week)
            .collect();
        week_indices.sort_by_key(|&i| entries[i].source_row);

        let target = week_indices
            .iter()
            .copied()
            .find(|&i| entries[i].key() == *decision)
            .ok_or_else(|| invalid(format!("entry '{}' is not a candidate", decision)))?;
        let project = &entries[target].project;

        let project_hours: WorkedTime = week_indices
            .iter()
            .filter(|&&i| entries[i].project == *project)
            .map(|&i| entries[i].duration)
            .sum();
        if project_hours < week.overtime {
            return Err(invalid(format!(
                "project '{}' has {}h in the week, less than {}h of overtime",
                project,
                project_hours.hours().normalize(),
                week.overtime.hours().normalize()
            )));
        }

        let order = std::iter::once(target).chain(
            week_indices
                .iter()
                .copied()
                .filter(|&i| i != target && entries[i].project == *project),
        );

        let mut remaining = week.overtime;
        let mut touched = Vec::new();
        for i in order {
            if remaining.is_zero() {
                break;
            }
            let share = remaining.min(entries[i].duration);
            overtime_by_entry[i] = share;
            remaining = remaining.saturating_sub(share);
            touched.push(serde_json::json!({
                "entry_key": entries[i].key().as_str(),
                "overtime": share.to_string(),
            }));
        }

        audit_steps.push(AuditStep {
            step_number,
            rule_id: "overtime_allocation".to_string(),
            rule_name: "Overtime Allocation".to_string(),
            input: serde_json::json!({
                "employee": employee,
                "week": week.week,
                "overtime": week.overtime.to_string(),
                "target_entry": decision.as_str(),
            }),
            output: serde_json::json!({
                "project": project,
                "allocations": touched,
            }),
            reasoning: format!(
                "Week {} overtime of {}h booked to '{}'",
                week.week,
                week.overtime.hours().normalize(),
                project
            ),
        });
        step_number += 1;
    }

    let allocations = entries
        .iter()
        .zip(overtime_by_entry)
        .map(|(entry, overtime)| EntryAllocation {
            entry: entry.clone(),
            regular: entry.duration.saturating_sub(overtime),
            overtime,
        })
        .collect();

    Ok(OvertimeAllocationResult {
        allocations,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregate_weekly_hours;
    use crate::models::{OvertimeDecision, PayType};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn entry(week: u8, project: &str, minutes: u32, row: usize) -> TimeEntry {
        TimeEntry {
            employee_name: "A".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 2 + row as u32).unwrap(),
            project: project.to_string(),
            duration: WorkedTime::from_minutes(minutes),
            is_billable: true,
            week,
            source_row: row,
        }
    }

    fn weeks_for(entries: &[TimeEntry]) -> Vec<WeeklyAggregate> {
        aggregate_weekly_hours("A", PayType::Hourly, entries, WorkedTime::from_hours(40), 1).weeks
    }

    fn decide(entry: &TimeEntry) -> OvertimeDecisions {
        vec![OvertimeDecision {
            employee: "A".to_string(),
            week: entry.week,
            entry_key: entry.key(),
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_overtime_goes_to_chosen_entry() {
        let entries = vec![entry(1, "Alpha", 30, 1), entry(1, "Beta", 2400, 2)];
        let weeks = weeks_for(&entries);

        let result = allocate_overtime("A", &entries, &weeks, &decide(&entries[0]), 1).unwrap();

        assert_eq!(result.allocations[0].regular, WorkedTime::ZERO);
        assert_eq!(result.allocations[0].overtime, WorkedTime::from_minutes(30));
        assert_eq!(result.allocations[1].regular, WorkedTime::from_hours(40));
        assert_eq!(result.allocations[1].overtime, WorkedTime::ZERO);
        assert_eq!(result.audit_steps.len(), 1);
        assert_eq!(result.audit_steps[0].output["project"], "Alpha");
    }

    #[test]
    fn test_overflow_spills_to_same_project_in_row_order() {
        // 45h week, 5h overtime; chosen Alpha entry is only 2h.
        let entries = vec![
            entry(1, "Alpha", 120, 1),
            entry(1, "Beta", 2220, 2),
            entry(1, "Alpha", 240, 3),
            entry(1, "Alpha", 120, 4),
        ];
        let weeks = weeks_for(&entries);

        let result = allocate_overtime("A", &entries, &weeks, &decide(&entries[0]), 1).unwrap();

        let overtime: Vec<u32> = result.allocations.iter().map(|a| a.overtime.minutes()).collect();
        assert_eq!(overtime, vec![120, 0, 180, 0]);
        let regular: Vec<u32> = result.allocations.iter().map(|a| a.regular.minutes()).collect();
        assert_eq!(regular, vec![0, 2220, 60, 120]);
    }

    #[test]
    fn test_missing_decision_is_an_error() {
        let entries = vec![entry(1, "Alpha", 2460, 1)];
        let weeks = weeks_for(&entries);

        match allocate_overtime("A", &entries, &weeks, &OvertimeDecisions::new(), 1) {
            Err(EngineError::MissingOvertimeDecision { employee, week }) => {
                assert_eq!(employee, "A");
                assert_eq!(week, 1);
            }
            other => panic!("Expected MissingOvertimeDecision, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_key_is_invalid() {
        let entries = vec![entry(1, "Alpha", 2460, 1)];
        let weeks = weeks_for(&entries);
        let decisions: OvertimeDecisions = vec![OvertimeDecision {
            employee: "A".to_string(),
            week: 1,
            entry_key: "A|1|2025-03-03|Nowhere|1".into(),
        }]
        .into_iter()
        .collect();

        let result = allocate_overtime("A", &entries, &weeks, &decisions, 1);
        assert!(matches!(result, Err(EngineError::InvalidOvertimeDecision { .. })));
    }

    #[test]
    fn test_key_from_other_week_is_invalid() {
        let entries = vec![entry(1, "Alpha", 2460, 1), entry(2, "Alpha", 60, 2)];
        let weeks = weeks_for(&entries);
        let decisions: OvertimeDecisions = vec![OvertimeDecision {
            employee: "A".to_string(),
            week: 1,
            entry_key: entries[1].key(),
        }]
        .into_iter()
        .collect();

        let result = allocate_overtime("A", &entries, &weeks, &decisions, 1);
        assert!(matches!(result, Err(EngineError::InvalidOvertimeDecision { .. })));
    }

    #[test]
    fn test_target_project_too_short_is_invalid() {
        // 45h week, 5h overtime, Alpha only has 1h.
        let entries = vec![entry(1, "Alpha", 60, 1), entry(1, "Beta", 2640, 2)];
        let weeks = weeks_for(&entries);

        match allocate_overtime("A", &entries, &weeks, &decide(&entries[0]), 1) {
            Err(EngineError::InvalidOvertimeDecision { message, .. }) => {
                assert!(message.contains("Alpha"));
            }
            other => panic!("Expected InvalidOvertimeDecision, got {other:?}"),
        }
    }

    #[test]
    fn test_no_overtime_needs_no_decision() {
        let entries = vec![entry(1, "Alpha", 2400, 1)];
        let weeks = weeks_for(&entries);

        let result = allocate_overtime("A", &entries, &weeks, &OvertimeDecisions::new(), 1).unwrap();
        assert_eq!(result.allocations[0].regular, WorkedTime::from_hours(40));
        assert!(result.audit_steps.is_empty());
    }

    proptest! {
        #[test]
        fn prop_allocated_overtime_matches_weekly_overtime(
            minutes in proptest::collection::vec(60u32..900, 2..10),
            target in 0usize..10,
        ) {
            let entries: Vec<TimeEntry> = minutes
                .iter()
                .enumerate()
                .map(|(i, m)| entry(1, "Alpha", *m, i + 1))
                .collect();
            let weeks = weeks_for(&entries);
            let target = &entries[target % entries.len()];

            let result = allocate_overtime("A", &entries, &weeks, &decide(target), 1).unwrap();

            let overtime: WorkedTime = result.allocations.iter().map(|a| a.overtime).sum();
            let regular: WorkedTime = result.allocations.iter().map(|a| a.regular).sum();
            prop_assert_eq!(overtime, weeks[0].overtime);
            prop_assert_eq!(regular, weeks[0].regular);
            for allocation in &result.allocations {
                prop_assert_eq!(allocation.regular + allocation.overtime, allocation.entry.duration);
            }
        }
    }
}
