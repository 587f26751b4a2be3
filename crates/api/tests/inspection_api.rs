//! Tests for scheduling and completing inspection records.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, put_json, seeded_store};
use serde_json::json;

#[tokio::test]
async fn create_get_and_complete() {
    let store = seeded_store().await;
    let app = || common::build_test_app(store.clone());

    let response = post_json(
        app(),
        "/api/v1/inspections",
        json!({
            "premises_ref": "FP/RELAXED",
            "inspection_date": "2024-06-03",
            "inspection_time": "09:30",
            "inspection_type": "complaint",
            "inspector_name": "A. Officer"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await["data"].clone();
    assert_eq!(created["status"], "scheduled");
    assert_eq!(created["inspection_type"], "complaint");
    assert!(created["reference_number"].as_str().unwrap().starts_with("FHI-"));
    let id = created["id"].as_i64().unwrap();

    let fetched = body_json(get(app(), &format!("/api/v1/inspections/{id}")).await).await;
    assert_eq!(fetched["data"]["reference_number"], created["reference_number"]);

    let response = put_json(
        app(),
        &format!("/api/v1/inspections/{id}/complete"),
        json!({
            "hygienic_score": 5,
            "structure_score": 5,
            "management_score": 5,
            "revisit_required": false
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let completed = body_json(response).await["data"].take();
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["total_score"], 15);
    assert_eq!(completed["fhrs_rating"], 5);

    let response = put_json(app(), &format!("/api/v1/inspections/{id}/complete"), json!({})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_for_unknown_premises_is_404() {
    let app = common::build_test_app(seeded_store().await);
    let response = post_json(app, "/api/v1/inspections", json!({"premises_ref": "FP/NOPE"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_inspection_is_404() {
    let app = common::build_test_app(seeded_store().await);
    let response = get(app, "/api/v1/inspections/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Inspection not found: 999");
}

#[tokio::test]
async fn out_of_range_scores_are_rejected() {
    let store = seeded_store().await;
    let app = || common::build_test_app(store.clone());

    let created = body_json(
        post_json(app(), "/api/v1/inspections", json!({"premises_ref": "FP/URGENT"})).await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app(),
        &format!("/api/v1/inspections/{id}/complete"),
        json!({"hygienic_score": 40}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
