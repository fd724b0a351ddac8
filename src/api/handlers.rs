//! HTTP request handlers for the Job Cost Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{Employee, ReferencePayroll};
use crate::parsing::{parse_reference_payroll, parse_timesheets};
use crate::run::JobCostEngine;

use super::request::{CompleteRunRequest, CreateRunRequest};
use super::response::{ApiError, ApiErrorResponse, CreateRunResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/roster", get(roster_handler))
        .route("/runs", post(create_run_handler))
        .route("/runs/:run_id/complete", post(complete_run_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}

/// Handler for GET /roster.
async fn roster_handler(State(state): State<AppState>) -> impl IntoResponse {
    let employees: Vec<Employee> = state.roster().all().into_iter().cloned().collect();
    json_response(StatusCode::OK, employees)
}

/// Handler for POST /runs.
///
/// Parses both weekly exports and runs phase 1. The run is kept until it is
/// completed with the overtime decisions.
async fn create_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRunRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing create run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let parsed = match parse_timesheets(&request.week1, &request.week2, &state.config().input) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Timesheet export rejected"
            );
            return error_response(err);
        }
    };

    let engine = JobCostEngine::new(state.roster(), state.config());
    let context = engine.prepare(parsed);
    let response = CreateRunResponse::from(&context);

    info!(
        correlation_id = %correlation_id,
        run_id = %context.run_id,
        overtime_weeks = response.overtime_situations.len(),
        unknown_employees = response.unknown_employees.len(),
        "Run created"
    );
    state.runs().insert(context);

    json_response(StatusCode::CREATED, response)
}

/// Handler for POST /runs/:run_id/complete.
///
/// Runs phase 2 with the overtime decisions and optional reference payroll,
/// and returns the job cost report. The run is removed once reported.
async fn complete_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    payload: Result<Json<CompleteRunRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        "Processing complete run request"
    );

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let references: Option<Vec<ReferencePayroll>> = match &request.reference_payroll {
        Some(content) => match parse_reference_payroll(content) {
            Ok(references) => Some(references),
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Reference payroll rejected"
                );
                return error_response(err);
            }
        },
        None => None,
    };

    let Some(context) = Uuid::parse_str(&run_id)
        .ok()
        .and_then(|id| state.runs().remove(id))
    else {
        warn!(correlation_id = %correlation_id, run_id = %run_id, "Run not found");
        return error_response(EngineError::RunNotFound { run_id });
    };

    let engine = JobCostEngine::new(state.roster(), state.config());
    let report = engine.complete(
        &context,
        &request.overtime_decisions(),
        references.as_deref(),
    );

    info!(
        correlation_id = %correlation_id,
        run_id = %report.run_id,
        line_items = report.line_items.len(),
        failures = report.failures.len(),
        total_cost = %report.total_cost(),
        duration_us = report.audit_trace.duration_us,
        "Run completed successfully"
    );

    json_response(StatusCode::OK, report)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}
