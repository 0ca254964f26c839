use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::analytics::{AnalyticsFacade, ReportRequest};
use crate::config::AnalyticsConfig;
use crate::handlers;
use crate::store::MemoryStore;
use crate::AppState;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn facade(store: MemoryStore) -> AnalyticsFacade {
    AnalyticsFacade::new(Arc::new(store), AnalyticsConfig::default())
}

/// A request for June 2025 as seen on June 15th.
pub fn june_request() -> ReportRequest {
    ReportRequest::for_today(date(2025, 6, 15)).with_period(2025, 6)
}

pub fn test_app(store: MemoryStore) -> Router {
    test_app_with_config(store, AnalyticsConfig::default())
}

pub fn test_app_with_config(store: MemoryStore, config: AnalyticsConfig) -> Router {
    let state = Arc::new(AppState {
        analytics: AnalyticsFacade::new(Arc::new(store), config),
        db_pool: None,
    });
    handlers::router(state)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
