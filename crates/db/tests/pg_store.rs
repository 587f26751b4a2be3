//! Integration tests for [`PgDataStore`] against a live PostgreSQL.
//!
//! Run with `DATABASE_URL` set and `--ignored`.

use chrono::{NaiveDate, TimeZone};
use hygiene_core::catalog::RiskCategory;
use hygiene_core::error::CoreError;
use hygiene_core::inspection::{InspectionOutcome, InspectionStatus, InspectionType, NewInspection};
use hygiene_core::premises::{EnforcementAction, Premises};
use hygiene_core::store::{DataStore, RecordStore};
use hygiene_core::types::Timestamp;
use hygiene_db::PgDataStore;
use sqlx::PgPool;

fn now() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn premises(reference: &str, category: Option<RiskCategory>, due: Option<NaiveDate>) -> Premises {
    let mut p = Premises::new(reference, format!("Business {reference}"));
    p.risk_category = category;
    p.next_inspection_due = due;
    p
}

// ---------------------------------------------------------------------------
// Test: upsert replaces the action history wholesale
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_replaces_history(pool: PgPool) {
    let store = PgDataStore::new(pool);
    let action = EnforcementAction::new(NaiveDate::from_ymd_opt(2023, 1, 5), "Written Warning", "Bins");

    store
        .upsert_premises(premises("FP/1", Some(RiskCategory::B), None), vec![action.clone(), action])
        .await
        .unwrap();
    assert_eq!(store.get_previous_actions("FP/1").await.unwrap().len(), 2);

    store
        .upsert_premises(premises("FP/1", Some(RiskCategory::A), None), vec![])
        .await
        .unwrap();
    assert!(store.get_previous_actions("FP/1").await.unwrap().is_empty());

    let stored = store.get_premises("FP/1").await.unwrap().unwrap();
    assert_eq!(stored.risk_category, Some(RiskCategory::A));
}

// ---------------------------------------------------------------------------
// Test: due query filter and ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn due_query_filters_and_orders(pool: PgPool) {
    let store = PgDataStore::new(pool);
    let soon = NaiveDate::from_ymd_opt(2024, 4, 1);
    let far = NaiveDate::from_ymd_opt(2026, 1, 1);

    let mut ceased = premises("X", Some(RiskCategory::A), soon);
    ceased.approval_status = "Ceased Trading".to_string();

    for p in [
        premises("U", None, soon),
        premises("B2", Some(RiskCategory::B), soon),
        premises("B0", Some(RiskCategory::B), None),
        premises("A1", Some(RiskCategory::A), soon),
        premises("FAR", Some(RiskCategory::A), far),
        ceased,
    ] {
        store.upsert_premises(p, vec![]).await.unwrap();
    }

    let due = store.get_premises_due_inspection(6, now()).await.unwrap();
    let refs: Vec<_> = due.iter().map(|p| p.premises_ref.as_str()).collect();
    assert_eq!(refs, ["A1", "B0", "B2", "U"]);
}

// ---------------------------------------------------------------------------
// Test: inspection lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn inspection_lifecycle(pool: PgPool) {
    let store = PgDataStore::new(pool);
    store
        .upsert_premises(premises("FP/1", Some(RiskCategory::C), None), vec![])
        .await
        .unwrap();

    let created = store
        .create_inspection(
            NewInspection {
                premises_ref: "FP/1".to_string(),
                inspection_date: NaiveDate::from_ymd_opt(2024, 3, 4),
                inspection_time: Some("10:00".to_string()),
                inspection_type: InspectionType::Complaint,
                inspector_name: None,
                inspector_id: None,
            },
            now(),
        )
        .await
        .unwrap();
    assert_eq!(created.status, InspectionStatus::Scheduled);

    let outcome = InspectionOutcome {
        hygienic_score: Some(10),
        structure_score: Some(10),
        management_score: Some(10),
        ..Default::default()
    };
    let completed = store
        .complete_inspection(created.id, &outcome, now())
        .await
        .unwrap();
    assert_eq!(completed.total_score, Some(30));
    assert_eq!(completed.fhrs_rating, Some(3));

    let again = store.complete_inspection(created.id, &outcome, now()).await;
    assert!(matches!(again, Err(CoreError::Conflict(_))));

    assert_eq!(store.get_inspections_for_premises("FP/1").await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_for_unknown_premises_is_not_found(pool: PgPool) {
    let store = PgDataStore::new(pool);
    let result = store
        .create_inspection(
            NewInspection {
                premises_ref: "NOPE".to_string(),
                inspection_date: None,
                inspection_time: None,
                inspection_type: InspectionType::Routine,
                inspector_name: None,
                inspector_id: None,
            },
            now(),
        )
        .await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}
