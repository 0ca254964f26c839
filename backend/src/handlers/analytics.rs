//! Analytics endpoints, one per actor view.
//!
//! Handlers read the wall clock once and hand `today` to the facade; nothing
//! below them looks at the current time.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::analytics::calendar::CalendarMonth;
use crate::analytics::{Actor, AnalyticsReport, ReportRequest};
use crate::pagination::{PaginationParams, DEFAULT_PAGE, MAX_PAGE, MAX_PAGE_SIZE};
use crate::validation::Validator;
use crate::{ApiResult, AppState};

// ==================== Query Parameters ====================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl AnalyticsQuery {
    pub fn into_request(self, today: NaiveDate) -> ApiResult<ReportRequest> {
        Validator::new()
            .period(self.year, self.month)
            .in_range(self.page, "page", 1, MAX_PAGE)
            .in_range(self.per_page, "per_page", 1, MAX_PAGE_SIZE)
            .finish()?;

        Ok(ReportRequest {
            year: self.year,
            month: self.month,
            today,
            pagination: PaginationParams {
                page: self.page.unwrap_or(DEFAULT_PAGE),
                per_page: self.per_page,
            },
        })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ==================== Routes ====================

pub fn analytics_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(get_admin_report))
        .route("/customers/:id", get(get_customer_report))
        .route("/representatives/:id", get(get_representative_report))
        .route("/representatives/:id/calendar", get(get_representative_calendar))
        .route("/mobile/representatives/:id", get(get_mobile_report))
}

async fn build_report(
    state: &AppState,
    actor: Actor,
    query: AnalyticsQuery,
) -> ApiResult<Json<AnalyticsReport>> {
    let request = query.into_request(today())?;
    let report = state.analytics.report(actor, &request).await?;
    Ok(Json(report))
}

pub async fn get_admin_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsReport>> {
    build_report(&state, Actor::Administrator, query).await
}

pub async fn get_customer_report(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsReport>> {
    build_report(&state, Actor::Customer(customer_id), query).await
}

pub async fn get_representative_report(
    State(state): State<Arc<AppState>>,
    Path(representative_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsReport>> {
    build_report(&state, Actor::Representative(representative_id), query).await
}

pub async fn get_mobile_report(
    State(state): State<Arc<AppState>>,
    Path(representative_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<AnalyticsReport>> {
    build_report(&state, Actor::Mobile(representative_id), query).await
}

pub async fn get_representative_calendar(
    State(state): State<Arc<AppState>>,
    Path(representative_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<CalendarMonth>> {
    let request = query.into_request(today())?;
    let calendar = state
        .analytics
        .calendar(Actor::Representative(representative_id), &request)
        .await?;
    Ok(Json(calendar))
}
