use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::database;
use crate::AppState;

pub mod analytics;

pub use analytics::analytics_routes;

pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let database = match &state.db_pool {
        Some(pool) if database::health_check(pool).await => "connected",
        Some(_) => "unreachable",
        None => "not configured",
    };
    let status = if database == "unreachable" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let pool = state.db_pool.as_ref().map(database::get_pool_stats);

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "healthy" } else { "degraded" },
            "service": "fieldrep-analytics",
            "database": database,
            "pool": pool,
        })),
    )
}

/// The full HTTP surface.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "FieldRep Analytics API v0.1.0" }))
        .route("/health", get(health_check))
        .route("/api/v1/analytics/health", get(health_check))
        .nest("/api/v1/analytics", analytics_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
