use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod analytics;
mod config;
mod database;
mod error;
mod handlers;
mod pagination;
mod store;
mod validation;

pub use error::{ApiError, ApiResult, AppError};
pub use pagination::{PaginatedResponse, PaginationMeta, PaginationParams};
pub use validation::Validator;

use analytics::AnalyticsFacade;
use store::PgSalesStore;

#[cfg(test)]
mod tests;

pub struct AppState {
    pub analytics: AnalyticsFacade,
    /// Present when the store is Postgres-backed; used by the health check.
    pub db_pool: Option<sqlx::PgPool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env()?;
    let db_pool = database::create_pool(&config.database_url).await?;

    tracing::info!(
        top_products = config.analytics.top_products,
        low_stock_threshold = config.analytics.low_stock_threshold,
        week_start = %config.analytics.week_start,
        "analytics configured"
    );

    let store = Arc::new(PgSalesStore::new(db_pool.clone()));
    let app_state = Arc::new(AppState {
        analytics: AnalyticsFacade::new(store, config.analytics.clone()),
        db_pool: Some(db_pool),
    });

    let app = handlers::router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    tracing::info!("Server running on {}", config.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
