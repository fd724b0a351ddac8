//! Error types for the Job Cost Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while parsing timesheets,
//! allocating overtime and costing labor.

use thiserror::Error;

/// The main error type for the Job Cost Engine.
///
/// Reconciliation variances are not errors: they are reported as a status on
/// the reconciliation result and never abort a run.
///
/// # Example
///
/// ```
/// use job_cost_engine::error::EngineError;
///
/// let error = EngineError::UnknownEmployee {
///     name: "Jane Doe".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found in roster: 'Jane Doe'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration or roster file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration or roster file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A value (duration, date, file layout) did not have the expected format.
    #[error("Invalid format for '{value}': {message}")]
    FormatError {
        /// The offending input value.
        value: String,
        /// A description of what was expected.
        message: String,
    },

    /// An employee name has no exact match in the roster.
    #[error("Employee not found in roster: '{name}'")]
    UnknownEmployee {
        /// The name as it appeared in the timesheet.
        name: String,
    },

    /// Overtime was detected for an employee/week but no target entry was chosen.
    #[error("No overtime target selected for '{employee}' in week {week}")]
    MissingOvertimeDecision {
        /// The employee with overtime.
        employee: String,
        /// The week (1 or 2) containing the overtime.
        week: u8,
    },

    /// The chosen overtime target cannot receive the week's overtime.
    #[error("Invalid overtime target for '{employee}' in week {week}: {message}")]
    InvalidOvertimeDecision {
        /// The employee with overtime.
        employee: String,
        /// The week (1 or 2) containing the overtime.
        week: u8,
        /// Why the decision was rejected.
        message: String,
    },

    /// No phase-1 run context exists for the given run id.
    #[error("Run not found: {run_id}")]
    RunNotFound {
        /// The requested run id.
        run_id: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// The allocation report could not be written.
    #[error("Failed to write report: {message}")]
    OutputError {
        /// A description of the write failure.
        message: String,
    },
}

impl EngineError {
    /// Returns a stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::FormatError { .. } => "FORMAT_ERROR",
            EngineError::UnknownEmployee { .. } => "UNKNOWN_EMPLOYEE",
            EngineError::MissingOvertimeDecision { .. } => "MISSING_OT_DECISION",
            EngineError::InvalidOvertimeDecision { .. } => "INVALID_OT_DECISION",
            EngineError::RunNotFound { .. } => "RUN_NOT_FOUND",
            EngineError::CalculationError { .. } => "CALCULATION_ERROR",
            EngineError::OutputError { .. } => "OUTPUT_ERROR",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
