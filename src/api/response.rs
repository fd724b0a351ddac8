//! Response types for the Job Cost Engine API.
//!
//! This module defines the success bodies of the run endpoints and the error
//! response structures for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{OvertimeSituation, ParseIssue};
use crate::run::RunContext;

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the server is up.
    pub status: String,
    /// The engine version.
    pub version: String,
}

/// Response body for `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunResponse {
    /// The id to complete the run with.
    pub run_id: Uuid,
    /// Whether any overtime week needs a decision.
    pub requires_overtime_selection: bool,
    /// Weeks whose overtime needs a target entry.
    pub overtime_situations: Vec<OvertimeSituation>,
    /// Timesheet rows that could not be parsed.
    pub parse_issues: Vec<ParseIssue>,
    /// Timesheet names with no roster record.
    pub unknown_employees: Vec<String>,
}

impl From<&RunContext> for CreateRunResponse {
    fn from(context: &RunContext) -> Self {
        Self {
            run_id: context.run_id,
            requires_overtime_selection: context.requires_overtime_selection(),
            overtime_situations: context.overtime_situations.clone(),
            parse_issues: context.parse_issues.clone(),
            unknown_employees: context.unknown_employees(),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error.code();
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(code, "Configuration error", message),
                }
            }
            EngineError::FormatError { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    code,
                    message,
                    "The uploaded export does not have the expected layout",
                ),
            },
            EngineError::UnknownEmployee { .. }
            | EngineError::MissingOvertimeDecision { .. }
            | EngineError::InvalidOvertimeDecision { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(code, message),
            },
            EngineError::RunNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    code,
                    message,
                    "Runs are removed once completed and do not survive a restart",
                ),
            },
            EngineError::CalculationError { .. } | EngineError::OutputError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new(code, message),
                }
            }
        }
    }
}
