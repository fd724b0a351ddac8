//! End-to-end tests for the Job Cost Engine.
//!
//! This test suite covers:
//! - The HTTP workflow (create a run, complete it with overtime decisions)
//! - Reconciliation against a reference payroll export
//! - Employee-level failures (unknown names, missing or invalid decisions)
//! - The allocation CSV layout
//! - Hourly overtime, salaried adjustment and unknown employee scenarios

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use job_cost_engine::api::{create_router, AppState};
use job_cost_engine::config::{ConfigLoader, EngineConfig};
use job_cost_engine::models::{
    Employee, JobCostReport, OvertimeDecision, OvertimeDecisions, PayType, ReconciliationStatus,
    TimeEntry, WorkedTime,
};
use job_cost_engine::parsing::ParsedTimesheet;
use job_cost_engine::report::write_allocation_csv;
use job_cost_engine::roster::{InMemoryRoster, YamlRoster};
use job_cost_engine::run::JobCostEngine;

// =============================================================================
// Test Helpers
// =============================================================================

const HEADER: &str = "\tActivity date\tCustomer full name\tDuration\tRates\tBillable";

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default")
        .expect("Failed to load config")
        .into_config();
    let roster = YamlRoster::load("./config/default/roster.yaml").expect("Failed to load roster");
    AppState::new(config, roster)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn export(date_range: &str, rows: &[&str]) -> String {
    let mut text = format!("Time Activities by Employee Detail\nAcme Builders\n{date_range}\n\n");
    text.push_str(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

fn week1() -> String {
    export(
        "March 3-9, 2025",
        &[
            "Denise Whitcomb\t\t\t\t\t",
            "\t03/03/2025\tShop Overhead\t08:00\t52.88\tNo",
            "Total for Denise Whitcomb\t\t\t08:00\t\t",
            "Ghost Worker\t\t\t\t\t",
            "\t03/03/2025\tHarbor Street Remodel\t04:00\t\tYes",
            "Total for Ghost Worker\t\t\t04:00\t\t",
            "Lori A. Frye\t\t\t\t\t",
            "\t03/03/2025\tHarbor Street Remodel\t08:00\t37.26\tYes",
            "\t03/04/2025\tHarbor Street Remodel\t08:00\t37.26\tYes",
            "\t03/05/2025\tHarbor Street Remodel\t08:00\t37.26\tYes",
            "\t03/06/2025\tHarbor Street Remodel\t08:00\t37.26\tYes",
            "\t03/07/2025\tMaple Court\t10:00\t37.26\tYes",
            "Total for Lori A. Frye\t\t\t42:00\t\t",
            "Marcella J. Gallick\t\t\t\t\t",
            "\t03/03/2025\tHarbor Street Remodel\t30:00\t67.36\tYes",
            "\t03/05/2025\tMaple Court\t30:00\t67.36\tYes",
            "Total for Marcella J. Gallick\t\t\t60:00\t\t",
            "TOTAL\t\t\t114:00\t\t",
        ],
    )
}

fn week2() -> String {
    export(
        "March 10-16, 2025",
        &[
            "Brandon K. Ortiz\t\t\t\t\t",
            "\t03/11/2025\tMaple Court\t39:30\t31.50\tYes",
            "Total for Brandon K. Ortiz\t\t\t39:30\t\t",
            "Marcella J. Gallick\t\t\t\t\t",
            "\t03/12/2025\tShop Overhead\t35:00\t67.36\tNo",
            "Total for Marcella J. Gallick\t\t\t35:00\t\t",
            "TOTAL\t\t\t74:30\t\t",
        ],
    )
}

const REFERENCE_PAYROLL: &str = "\
Employee Information,Salary,Reg Hrs,O/T Hr,PTO,Holiday,NEW RATES
\"Frye, Lori A.\",\"$1,602.18\",40.00,2.00,0,0,37.26
\"Gallick, Marcella J.\",\"$5,388.80\",80.00,0,0,0,67.36
\"Ortiz, Brandon\",\"$1,244.25\",39.50,0,0,0,31.50
\"Keane, Paul\",500.00,20.00,0,0,0,25.00
Total All Columns,\"$8,735.23\",179.5,2,0,0,
";

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn create_run(router: Router) -> Value {
    let (status, json) = send(
        router,
        "POST",
        "/runs",
        Some(json!({ "week1": week1(), "week2": week2() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json
}

/// Returns the entry key of the candidate booked to `project`.
fn candidate_key(created: &Value, employee: &str, project: &str) -> Value {
    created["overtime_situations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["employee"] == employee)
        .and_then(|s| {
            s["candidates"]
                .as_array()
                .unwrap()
                .iter()
                .find(|c| c["project"] == project)
        })
        .map(|c| c["entry_key"].clone())
        .expect("candidate not found")
}

async fn complete_run(router: Router, run_id: &str, body: Value) -> (StatusCode, Value) {
    send(router, "POST", &format!("/runs/{run_id}/complete"), Some(body)).await
}

// =============================================================================
// Health and roster
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, json) = send(create_router_for_test(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_roster_lists_employees_by_name() {
    let (status, json) = send(create_router_for_test(), "GET", "/roster", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "Brandon K. Ortiz",
            "Denise Whitcomb",
            "Lori A. Frye",
            "Marcella J. Gallick"
        ]
    );
    assert_eq!(decimal(json[0]["base_rate"].as_str().unwrap()), decimal("31.50"));
}

// =============================================================================
// Phase 1
// =============================================================================

#[tokio::test]
async fn test_create_run_reports_overtime_and_unknown_employees() {
    let created = create_run(create_router_for_test()).await;

    assert_eq!(created["requires_overtime_selection"], true);
    assert_eq!(created["unknown_employees"], json!(["Ghost Worker"]));
    assert!(created["parse_issues"].as_array().unwrap().is_empty());

    let situations = created["overtime_situations"].as_array().unwrap();
    assert_eq!(situations.len(), 1);
    assert_eq!(situations[0]["employee"], "Lori A. Frye");
    assert_eq!(situations[0]["week"], 1);
    assert_eq!(situations[0]["total_hours"], "42:00");
    assert_eq!(situations[0]["overtime_hours"], "02:00");
    assert_eq!(situations[0]["candidates"].as_array().unwrap().len(), 5);
    assert_eq!(
        candidate_key(&created, "Lori A. Frye", "Maple Court"),
        "Lori A. Frye|1|2025-03-07|Maple Court|10"
    );
}

#[tokio::test]
async fn test_missing_required_column_returns_400() {
    let broken = "Title\nCompany\nDates\n\n\tActivity date\tDuration\n";
    let (status, json) = send(
        create_router_for_test(),
        "POST",
        "/runs",
        Some(json!({ "week1": broken, "week2": week2() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "FORMAT_ERROR");
    assert!(json["message"].as_str().unwrap().contains("Customer full name"));
}

#[tokio::test]
async fn test_unparseable_row_is_reported_not_fatal() {
    let week1 = export(
        "March 3-9, 2025",
        &[
            "Lori A. Frye\t\t\t\t\t",
            "\t03/03/2025\tHarbor Street Remodel\t8h\t37.26\tYes",
            "\t03/04/2025\tHarbor Street Remodel\t08:00\t37.26\tYes",
        ],
    );
    let (status, json) = send(
        create_router_for_test(),
        "POST",
        "/runs",
        Some(json!({ "week1": week1, "week2": week2() })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let issues = json["parse_issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["week"], 1);
    assert_eq!(issues[0]["row"], 7);
}

// =============================================================================
// Phase 2
// =============================================================================

#[tokio::test]
async fn test_full_run_with_reconciliation() {
    let router = create_router_for_test();
    let created = create_run(router.clone()).await;
    let run_id = created["run_id"].as_str().unwrap();

    let (status, json) = complete_run(
        router,
        run_id,
        json!({
            "decisions": [{
                "employee": "Lori A. Frye",
                "week": 1,
                "entry_key": candidate_key(&created, "Lori A. Frye", "Maple Court"),
            }],
            "reference_payroll": REFERENCE_PAYROLL,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");

    let report: JobCostReport = serde_json::from_value(json).unwrap();
    assert_eq!(report.total_cost(), decimal("8235.23"));
    assert_eq!(report.excluded_owners, vec!["Denise Whitcomb".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].employee, "Ghost Worker");
    assert_eq!(report.failures[0].code, "UNKNOWN_EMPLOYEE");

    // Hourly: overtime booked to Maple Court at 1.5x
    let lori: Vec<_> = report.line_items_for("Lori A. Frye").collect();
    assert_eq!(lori.len(), 2);
    assert_eq!(lori[0].project, "Harbor Street Remodel");
    assert_eq!(lori[0].total_cost, decimal("1192.32"));
    assert_eq!(lori[1].project, "Maple Court");
    assert_eq!(lori[1].regular_hours, WorkedTime::from_hours(8));
    assert_eq!(lori[1].overtime_hours, WorkedTime::from_hours(2));
    assert_eq!(lori[1].overtime_cost, decimal("111.78"));

    // Salaried over 80 hours: lines sum exactly to 80 x base rate
    let marcella: Vec<Decimal> = report
        .line_items_for("Marcella J. Gallick")
        .map(|line| line.total_cost)
        .collect();
    assert_eq!(
        marcella,
        vec![decimal("1701.73"), decimal("1701.73"), decimal("1985.34")]
    );
    let summary = report.employee("Marcella J. Gallick").unwrap();
    assert_eq!(summary.total_cost, decimal("5388.80"));
    assert_eq!(summary.payrolled_hours, WorkedTime::from_hours(80));

    let reconciliation = report.reconciliation.as_ref().unwrap();
    assert_eq!(reconciliation.total_employees, 3);
    assert_eq!(reconciliation.ok_count, 3);
    assert_eq!(reconciliation.overall_variance, Decimal::ZERO);
    assert_eq!(reconciliation.unmatched_references, vec!["Keane, Paul".to_string()]);
    assert!(reconciliation.results.iter().all(|r| r.hours_match == Some(true)));
}

#[tokio::test]
async fn test_complete_without_decision_excludes_only_that_employee() {
    let router = create_router_for_test();
    let created = create_run(router.clone()).await;
    let run_id = created["run_id"].as_str().unwrap();

    let (status, json) = complete_run(router, run_id, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let report: JobCostReport = serde_json::from_value(json).unwrap();
    let lori = report
        .failures
        .iter()
        .find(|f| f.employee == "Lori A. Frye")
        .unwrap();
    assert_eq!(lori.code, "MISSING_OT_DECISION");
    assert!(report.employee("Lori A. Frye").is_none());
    assert!(report.employee("Marcella J. Gallick").is_some());
    assert!(report.employee("Brandon K. Ortiz").is_some());
    assert!(report.reconciliation.is_none());
}

#[tokio::test]
async fn test_decision_for_another_employees_entry_is_invalid() {
    let router = create_router_for_test();
    let created = create_run(router.clone()).await;
    let run_id = created["run_id"].as_str().unwrap();

    let (_, json) = complete_run(
        router,
        run_id,
        json!({
            "decisions": [{
                "employee": "Lori A. Frye",
                "week": 1,
                "entry_key": "Marcella J. Gallick|1|2025-03-03|Harbor Street Remodel|30",
            }]
        }),
    )
    .await;

    let report: JobCostReport = serde_json::from_value(json).unwrap();
    let lori = report
        .failures
        .iter()
        .find(|f| f.employee == "Lori A. Frye")
        .unwrap();
    assert_eq!(lori.code, "INVALID_OT_DECISION");
}

#[tokio::test]
async fn test_run_cannot_be_completed_twice() {
    let router = create_router_for_test();
    let created = create_run(router.clone()).await;
    let run_id = created["run_id"].as_str().unwrap();

    let (status, _) = complete_run(router.clone(), run_id, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = complete_run(router, run_id, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "RUN_NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_run_id_returns_404() {
    let (status, json) =
        complete_run(create_router_for_test(), "not-a-uuid", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "RUN_NOT_FOUND");
}

#[tokio::test]
async fn test_allocation_csv_for_completed_run() {
    let router = create_router_for_test();
    let created = create_run(router.clone()).await;
    let run_id = created["run_id"].as_str().unwrap();
    let (_, json) = complete_run(
        router,
        run_id,
        json!({
            "decisions": [{
                "employee": "Lori A. Frye",
                "week": 1,
                "entry_key": candidate_key(&created, "Lori A. Frye", "Maple Court"),
            }],
            "reference_payroll": REFERENCE_PAYROLL,
        }),
    )
    .await;
    let report: JobCostReport = serde_json::from_value(json).unwrap();

    let mut buffer = Vec::new();
    write_allocation_csv(&report, &mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();

    assert!(csv.starts_with("Employee Name,Project/Job Code,Hours,Rate,Amount,Rate Type,Notes"));
    assert!(csv.contains("Lori A. Frye,Maple Court,8.00,37.26,298.08,Base,"));
    assert!(csv.contains("Lori A. Frye,Maple Court,2.00,55.89,111.78,OT 1.5x,Overtime"));
    assert!(csv.contains(
        "Marcella J. Gallick,Harbor Street Remodel,30.00,56.724211,1701.73,Adjusted,95.0hrs total"
    ));
    assert!(csv.contains("Marcella J. Gallick,,,Calculated:,5388.80,Reference:,5388.80"));
    assert!(csv.contains(",,,Difference:,0.00,,Reconciled"));
    assert!(!csv.contains("Ghost Worker"));
    assert!(!csv.contains("Denise Whitcomb"));
}

// =============================================================================
// Core scenarios
// =============================================================================

fn scenario_roster() -> InMemoryRoster {
    let employee = |name: &str, pay_type, rate: &str| Employee {
        name: name.to_string(),
        pay_type,
        base_rate: decimal(rate),
        indirect_labor_code: String::new(),
        direct_labor_code: String::new(),
        reference_name: None,
        is_owner: false,
    };
    InMemoryRoster::new(vec![
        employee("A", PayType::Hourly, "100"),
        employee("B", PayType::Salaried, "67.36"),
    ])
}

fn entry(name: &str, week: u8, day: u32, project: &str, duration: &str, row: usize) -> TimeEntry {
    TimeEntry {
        employee_name: name.to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        project: project.to_string(),
        duration: duration.parse().unwrap(),
        is_billable: true,
        week,
        source_row: row,
    }
}

fn parsed(entries: Vec<TimeEntry>) -> ParsedTimesheet {
    ParsedTimesheet {
        entries,
        issues: vec![],
    }
}

#[test]
fn scenario_hourly_overtime_on_chosen_entry() {
    let roster = scenario_roster();
    let config = EngineConfig::default();
    let engine = JobCostEngine::new(&roster, &config);

    let entries = vec![
        entry("A", 1, 3, "Project X", "00:30", 6),
        entry("A", 1, 4, "Project Y", "40:00", 7),
    ];
    let context = engine.prepare(parsed(entries.clone()));
    assert_eq!(
        context.overtime_situations[0].overtime_hours,
        WorkedTime::from_minutes(30)
    );

    let decisions: OvertimeDecisions = vec![OvertimeDecision {
        employee: "A".to_string(),
        week: 1,
        entry_key: entries[0].key(),
    }]
    .into_iter()
    .collect();
    let report = engine.complete(&context, &decisions, None);

    let x = &report.line_items[0];
    assert_eq!(x.project, "Project X");
    assert_eq!(x.regular_hours, WorkedTime::ZERO);
    assert_eq!(x.overtime_hours, WorkedTime::from_minutes(30));
    assert_eq!(x.total_cost, decimal("75"));

    let y = &report.line_items[1];
    assert_eq!(y.regular_hours, WorkedTime::from_hours(40));
    assert_eq!(y.total_cost, decimal("4000"));

    let week = &report.employee("A").unwrap().weeks[0];
    assert_eq!(week.regular + week.overtime, week.total);
}

#[test]
fn scenario_salaried_adjustment_sums_exactly() {
    let roster = scenario_roster();
    let config = EngineConfig::default();
    let engine = JobCostEngine::new(&roster, &config);

    let context = engine.prepare(parsed(vec![
        entry("B", 1, 3, "Line 1", "30:00", 6),
        entry("B", 1, 5, "Line 2", "30:00", 7),
        entry("B", 2, 10, "Line 3", "35:00", 6),
    ]));
    let report = engine.complete(&context, &OvertimeDecisions::new(), None);

    let summary = report.employee("B").unwrap();
    assert_eq!(summary.adjusted_rate.unwrap().round_dp(4), decimal("56.7242"));
    assert!(summary.weeks.iter().all(|w| w.overtime.is_zero()));
    assert_eq!(report.total_cost(), decimal("5388.80"));
    assert_eq!(report.line_items[2].total_cost, decimal("1985.34"));
}

#[test]
fn scenario_unknown_employee_is_excluded() {
    let roster = scenario_roster();
    let config = EngineConfig::default();
    let engine = JobCostEngine::new(&roster, &config);

    let context = engine.prepare(parsed(vec![
        entry("Unknown Person", 1, 3, "Project X", "08:00", 6),
        entry("A", 1, 3, "Project X", "08:00", 9),
    ]));
    assert_eq!(context.unknown_employees(), vec!["Unknown Person".to_string()]);

    let report = engine.complete(&context, &OvertimeDecisions::new(), None);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].code, "UNKNOWN_EMPLOYEE");
    assert_eq!(report.employees.len(), 1);
    assert_eq!(report.total_cost(), decimal("800"));
    assert_eq!(
        report.employee("A").and_then(|s| s.reconciliation.as_ref()),
        None
    );
}

#[test]
fn scenario_missing_reference_is_reported() {
    let roster = scenario_roster();
    let config = EngineConfig::default();
    let engine = JobCostEngine::new(&roster, &config);

    let context = engine.prepare(parsed(vec![entry("A", 1, 3, "Project X", "08:00", 6)]));
    let report = engine.complete(&context, &OvertimeDecisions::new(), Some(&[][..]));

    let result = report.employee("A").unwrap().reconciliation.as_ref().unwrap();
    assert_eq!(result.status, ReconciliationStatus::MissingReference);
    assert_eq!(result.variance, decimal("800"));
    assert_eq!(
        report.reconciliation.unwrap().unmatched_employees,
        vec!["A".to_string()]
    );
}
