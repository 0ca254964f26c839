// Integration tests for Analytics API endpoints

use axum::http::StatusCode;

use crate::config::AnalyticsConfig;
use crate::store::MemoryStore;
use crate::tests::fixtures::june_2025;
use crate::tests::helpers::{get_json, test_app, test_app_with_config};

#[tokio::test]
async fn test_health_without_database() {
    let (status, body) = get_json(test_app(MemoryStore::new()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "not configured");
}

#[tokio::test]
async fn test_admin_report() {
    let scenario = june_2025();
    let (status, body) = get_json(
        test_app(scenario.store),
        "/api/v1/analytics/admin?year=2025&month=6",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actor"]["kind"], "administrator");
    assert_eq!(body["statistics"]["monthly_sales"].as_f64(), Some(800.0));
    assert_eq!(body["statistics"]["monthly_orders"].as_i64(), Some(3));
    assert_eq!(body["trends"]["sales_change"][5], "+45.5%");
    assert_eq!(body["orders"]["meta"]["total"].as_i64(), Some(7));
    assert!(body["inventory"]["low_stock"].is_array());
    assert!(body.get("calendar").is_none());

    // integer metrics stay integers on the wire
    let category = &body["distributions"]["by_category"][0];
    assert!(category["metrics"]["quantity"].is_i64());
    assert!(category["metrics"]["total_sales"].is_f64());
}

#[tokio::test]
async fn test_customer_report_scopes_orders() {
    let scenario = june_2025();
    let uri = format!(
        "/api/v1/analytics/customers/{}?year=2025&month=6&per_page=2",
        scenario.north_customer
    );
    let (status, body) = get_json(test_app(scenario.store), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["monthly_sales"].as_f64(), Some(600.0));
    assert_eq!(body["orders"]["meta"]["total"].as_i64(), Some(3));
    assert_eq!(body["orders"]["data"].as_array().map(Vec::len), Some(2));
    assert!(body["distributions"].get("by_region").is_none());
}

#[tokio::test]
async fn test_representative_and_mobile_reports() {
    let scenario = june_2025();
    let rep = scenario.north_rep;
    let store = scenario.store;

    let uri = format!("/api/v1/analytics/representatives/{}?year=2025&month=6", rep);
    let (status, body) = get_json(test_app(store.clone()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calendar"].as_array().map(Vec::len), Some(30));
    assert!(body["distributions"]["by_customer"].is_array());

    let uri = format!("/api/v1/analytics/mobile/representatives/{}?year=2025&month=6", rep);
    let (status, body) = get_json(test_app(store), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actor"]["kind"], "mobile");
    assert!(body.get("orders").is_none());
    assert!(body["upcoming_events"].is_array());
}

#[tokio::test]
async fn test_calendar_respects_week_start() {
    let scenario = june_2025();
    let uri = format!(
        "/api/v1/analytics/representatives/{}/calendar?year=2025&month=6",
        scenario.north_rep
    );
    let config = AnalyticsConfig {
        week_start: chrono::Weekday::Mon,
        ..Default::default()
    };
    let (status, body) = get_json(test_app_with_config(scenario.store, config), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week_start"], "Mon");
    assert_eq!(body["weeks"].as_array().map(Vec::len), Some(6));
    assert_eq!(body["weeks"][0][0]["date"], "2025-05-26");
    assert_eq!(body["weeks"][0][0]["is_current_month"], false);
}

#[tokio::test]
async fn test_invalid_period_is_rejected() {
    let (status, body) = get_json(
        test_app(MemoryStore::new()),
        "/api/v1/analytics/admin?year=2025&month=13",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["month"].is_array());
}

#[tokio::test]
async fn test_huge_page_number_is_rejected() {
    let (status, body) = get_json(
        test_app(june_2025().store),
        "/api/v1/analytics/admin?year=2025&month=6&page=9223372036854775807",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["page"].is_array());
}

#[tokio::test]
async fn test_last_valid_page_is_empty() {
    let uri = format!(
        "/api/v1/analytics/admin?year=2025&month=6&per_page=100&page={}",
        crate::pagination::MAX_PAGE
    );
    let (status, body) = get_json(test_app(june_2025().store), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"]["data"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["orders"]["meta"]["total"].as_i64(), Some(7));
}

#[tokio::test]
async fn test_empty_store_returns_zeroes() {
    let (status, body) = get_json(
        test_app(MemoryStore::new()),
        "/api/v1/analytics/admin?year=2024&month=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total_sales"].as_f64(), Some(0.0));
    assert_eq!(body["statistics"]["monthly_growth"].as_f64(), Some(0.0));
    assert_eq!(body["trends"]["sales_change"].as_array().map(Vec::len), Some(12));
    assert_eq!(body["orders"]["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let (status, _) = get_json(
        test_app(MemoryStore::new()),
        "/api/v1/analytics/customers/not-a-uuid",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
