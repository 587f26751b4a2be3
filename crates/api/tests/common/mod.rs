#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use hygiene_api::config::{ServerConfig, StoreBackend};
use hygiene_api::router::build_app_router;
use hygiene_api::state::AppState;
use hygiene_core::catalog::{CouncilDetails, InspectionCatalog, RiskCategory};
use hygiene_core::error::CoreError;
use hygiene_core::inspection::{Inspection, InspectionOutcome, NewInspection};
use hygiene_core::premises::{EnforcementAction, Premises};
use hygiene_core::store::memory::MemoryDataStore;
use hygiene_core::store::{DataStore, RecordStore};
use hygiene_core::types::{DbId, Timestamp};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        default_within_months: 6,
        store_backend: StoreBackend::Memory,
        database_url: None,
        council: CouncilDetails::default(),
    }
}

/// Build the full application router over the given store.
pub fn build_test_app<S: RecordStore + 'static>(store: Arc<S>) -> Router {
    let config = test_config();
    let state = AppState::new(store, InspectionCatalog::standard(), config.clone());
    build_app_router(state, &config)
}

/// App over an empty in-memory store.
pub fn empty_app() -> Router {
    build_test_app(Arc::new(MemoryDataStore::new()))
}

/// Date `days` from today (UTC).
pub fn days_from_today(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}

/// Overdue, never inspected, category A, rated 1. Scores around -28.
pub fn urgent_premises() -> Premises {
    let mut p = Premises::new("FP/URGENT", "Urgent Diner");
    p.risk_category = Some(RiskCategory::A);
    p.business_type = Some("takeaway".to_string());
    p.current_fhrs_rating = Some(1);
    p.next_inspection_due = Some(days_from_today(-10));
    p
}

/// Category E, rated 5, inspected, due in roughly five months.
pub fn relaxed_premises() -> Premises {
    let mut p = Premises::new("FP/RELAXED", "Relaxed Tearoom");
    p.risk_category = Some(RiskCategory::E);
    p.business_type = Some("restaurant".to_string());
    p.current_fhrs_rating = Some(5);
    p.last_inspection_date = Some(days_from_today(-900));
    p.next_inspection_due = Some(days_from_today(150));
    p.haccp_in_place = true;
    p.allergen_documentation = true;
    p
}

/// Registered but due well outside any six-month window.
pub fn distant_premises() -> Premises {
    let mut p = Premises::new("FP/DISTANT", "Distant Deli");
    p.risk_category = Some(RiskCategory::C);
    p.last_inspection_date = Some(days_from_today(-100));
    p.next_inspection_due = Some(days_from_today(700));
    p
}

pub fn hygiene_notice() -> EnforcementAction {
    EnforcementAction::new(
        NaiveDate::from_ymd_opt(2023, 11, 2),
        "Hygiene Improvement Notice",
        "Replace damaged chopping boards",
    )
}

/// Store seeded with the urgent, relaxed and distant premises.
pub async fn seeded_store() -> Arc<MemoryDataStore> {
    Arc::new(
        MemoryDataStore::with_premises([
            (urgent_premises(), vec![hygiene_notice()]),
            (relaxed_premises(), vec![]),
            (distant_premises(), vec![]),
        ])
        .await,
    )
}

pub async fn seeded_app() -> Router {
    build_test_app(seeded_store().await)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Unreachable store
// ---------------------------------------------------------------------------

/// A store whose every call fails as if the database were down.
pub struct UnavailableStore;

fn down<T>() -> Result<T, CoreError> {
    Err(CoreError::DataStoreUnavailable("connection refused".to_string()))
}

#[async_trait]
impl DataStore for UnavailableStore {
    async fn get_premises(&self, _: &str) -> Result<Option<Premises>, CoreError> {
        down()
    }
    async fn get_all_premises(&self) -> Result<Vec<Premises>, CoreError> {
        down()
    }
    async fn get_previous_actions(&self, _: &str) -> Result<Vec<EnforcementAction>, CoreError> {
        down()
    }
    async fn get_inspections_for_premises(&self, _: &str) -> Result<Vec<Inspection>, CoreError> {
        down()
    }
    async fn get_premises_due_inspection(
        &self,
        _: u32,
        _: Timestamp,
    ) -> Result<Vec<Premises>, CoreError> {
        down()
    }
    async fn health_check(&self) -> Result<(), CoreError> {
        down()
    }
}

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn upsert_premises(&self, _: Premises, _: Vec<EnforcementAction>) -> Result<(), CoreError> {
        down()
    }
    async fn create_inspection(&self, _: NewInspection, _: Timestamp) -> Result<Inspection, CoreError> {
        down()
    }
    async fn get_inspection(&self, _: DbId) -> Result<Option<Inspection>, CoreError> {
        down()
    }
    async fn complete_inspection(
        &self,
        _: DbId,
        _: &InspectionOutcome,
        _: Timestamp,
    ) -> Result<Inspection, CoreError> {
        down()
    }
}
