//! Core data models for the Job Cost Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod employee;
mod line_item;
mod overtime;
mod pay_period;
mod reconciliation;
mod report;
mod time_entry;
mod worked_time;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use employee::{Employee, PayType};
pub use line_item::{EntryContribution, LineItemCost, RateKind};
pub use overtime::{
    OvertimeCandidate, OvertimeDecision, OvertimeDecisions, OvertimeSituation, WeeklyAggregate,
};
pub use pay_period::PayPeriod;
pub use reconciliation::{
    ReconciliationResult, ReconciliationStatus, ReconciliationSummary, ReferencePayroll,
};
pub use report::{EmployeeFailure, EmployeeSummary, JobCostReport};
pub use time_entry::{EntryKey, ParseIssue, TimeEntry};
pub use worked_time::WorkedTime;
