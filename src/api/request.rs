//! Request types for the Job Cost Engine API.

use serde::{Deserialize, Serialize};

use crate::models::{OvertimeDecision, OvertimeDecisions};

/// Request body for `POST /runs`.
///
/// Both weeks are the raw text of the weekly timesheet exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunRequest {
    /// The first week's export.
    pub week1: String,
    /// The second week's export.
    pub week2: String,
}

/// Request body for `POST /runs/:run_id/complete`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteRunRequest {
    /// One chosen target entry per overtime week.
    #[serde(default)]
    pub decisions: Vec<OvertimeDecision>,
    /// Raw text of the reference payroll export, if reconciliation is wanted.
    #[serde(default)]
    pub reference_payroll: Option<String>,
}

impl CompleteRunRequest {
    /// Indexes the decisions by employee and week.
    pub fn overtime_decisions(&self) -> OvertimeDecisions {
        self.decisions.iter().cloned().collect()
    }
}
