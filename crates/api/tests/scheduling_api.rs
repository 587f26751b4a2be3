//! Tests for the due work-list and workload endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, seeded_app};

#[tokio::test]
async fn due_list_is_ordered_by_priority() {
    let response = get(seeded_app().await, "/api/v1/inspections/due").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["within_months"], 6);

    let inspections = data["inspections"].as_array().unwrap();
    let refs: Vec<_> = inspections
        .iter()
        .map(|i| i["premises_ref"].as_str().unwrap())
        .collect();
    assert_eq!(refs, ["FP/URGENT", "FP/RELAXED"]);

    let urgent = &inspections[0];
    let score = |i: &serde_json::Value| i["priority_score"].as_i64().unwrap();
    assert!(score(urgent) < score(&inspections[1]));
    assert_eq!(urgent["is_overdue"], true);
    // Floored from now to midnight of the due date.
    let days = urgent["days_until_due"].as_i64().unwrap();
    assert!((-11..=-10).contains(&days), "{days}");
    assert_eq!(urgent["is_new_business"], true);
    assert_eq!(urgent["requires_revisit"], true);
    assert_eq!(urgent["inspection_interval_months"], 6);
    assert_eq!(urgent["risk_category"], "A");
    assert_eq!(urgent["previous_actions"].as_array().unwrap().len(), 1);

    let summary = &data["summary"];
    assert_eq!(summary["total_due"], 2);
    assert_eq!(summary["overdue"], 1);
    assert_eq!(summary["by_risk_category"]["A"], 1);
    assert_eq!(summary["by_risk_category"]["E"], 1);
}

#[tokio::test]
async fn wider_window_includes_distant_premises() {
    let response = get(seeded_app().await, "/api/v1/inspections/due?months=60").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["inspections"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn workload_summary_counts() {
    let response = get(seeded_app().await, "/api/v1/inspections/workload?months=6").await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].take();
    assert_eq!(data["total_due"], 2);
    assert_eq!(data["overdue"], 1);
    assert_eq!(data["new_businesses"], 1);
    assert_eq!(data["requires_revisit"], 1);
    assert_eq!(data["by_business_type"]["takeaway"], 1);
    assert_eq!(data["by_business_type"]["restaurant"], 1);
    let by_month: u64 = data["by_month"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(by_month, 2);
}
