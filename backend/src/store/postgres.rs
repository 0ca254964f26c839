//! Postgres implementation of [`SalesStore`].
//!
//! Expected tables: `orders`, `line_items`, `products`, `customers`,
//! `representatives`, `events`, with the columns of the matching records in
//! `fieldrep-shared`. `orders.sale_date` is TEXT in month/day/year form.

use async_trait::async_trait;
use sqlx::PgPool;

use fieldrep_shared::{CustomerRecord, EventRow, OrderRow, ProductRecord, SaleLineRow};

use super::{OwnerScope, SalesStore, StoreError, StoreResult};
use crate::analytics::period::DateWindow;

#[derive(Clone)]
pub struct PgSalesStore {
    pool: PgPool,
}

impl PgSalesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Pool exhaustion is reported as unavailability; anything else is a database error.
fn log_failure(query: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            tracing::warn!("No connection for {}: {}", query, e);
            StoreError::Unavailable(format!("no database connection for {}", query))
        }
        e => {
            tracing::error!("Error fetching {}: {}", query, e);
            StoreError::Database(e)
        }
    }
}

#[async_trait]
impl SalesStore for PgSalesStore {
    async fn orders(&self, scope: OwnerScope) -> StoreResult<Vec<OrderRow>> {
        sqlx::query_as::<_, OrderRow>(
            r#"SELECT
                o.id,
                o.customer_id,
                o.representative_id,
                c.name AS customer_name,
                c.region AS region,
                o.sale_date,
                o.total_amount,
                o.status,
                (SELECT COUNT(*) FROM line_items li WHERE li.order_id = o.id) AS item_count
             FROM orders o
             LEFT JOIN customers c ON c.id = o.customer_id
             WHERE ($1::uuid IS NULL OR o.customer_id = $1)
               AND ($2::uuid IS NULL OR o.representative_id = $2)
             ORDER BY o.id"#,
        )
        .bind(scope.customer_id())
        .bind(scope.representative_id())
        .fetch_all(&self.pool)
        .await
        .map_err(log_failure("orders"))
    }

    async fn sale_lines(&self, scope: OwnerScope) -> StoreResult<Vec<SaleLineRow>> {
        sqlx::query_as::<_, SaleLineRow>(
            r#"SELECT
                li.id,
                li.order_id,
                li.product_id,
                li.quantity,
                li.line_total,
                li.promo,
                li.discount,
                li.free_quantity,
                o.customer_id,
                o.representative_id,
                o.sale_date,
                o.status,
                p.brand_name AS product_name,
                p.category,
                c.name AS customer_name,
                c.region,
                r.name AS representative_name
             FROM line_items li
             JOIN orders o ON o.id = li.order_id
             LEFT JOIN products p ON p.id = li.product_id
             LEFT JOIN customers c ON c.id = o.customer_id
             LEFT JOIN representatives r ON r.id = o.representative_id
             WHERE ($1::uuid IS NULL OR o.customer_id = $1)
               AND ($2::uuid IS NULL OR o.representative_id = $2)
             ORDER BY o.id, li.id"#,
        )
        .bind(scope.customer_id())
        .bind(scope.representative_id())
        .fetch_all(&self.pool)
        .await
        .map_err(log_failure("sale lines"))
    }

    async fn products(&self) -> StoreResult<Vec<ProductRecord>> {
        sqlx::query_as::<_, ProductRecord>(
            r#"SELECT id, brand_name, generic_name, category, price, inventory
             FROM products
             ORDER BY brand_name, id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(log_failure("products"))
    }

    async fn customers(&self, scope: OwnerScope) -> StoreResult<Vec<CustomerRecord>> {
        sqlx::query_as::<_, CustomerRecord>(
            r#"SELECT id, name, region, representative_id
             FROM customers
             WHERE ($1::uuid IS NULL OR id = $1)
               AND ($2::uuid IS NULL OR representative_id = $2)
             ORDER BY name, id"#,
        )
        .bind(scope.customer_id())
        .bind(scope.representative_id())
        .fetch_all(&self.pool)
        .await
        .map_err(log_failure("customers"))
    }

    async fn events(&self, scope: OwnerScope, window: DateWindow) -> StoreResult<Vec<EventRow>> {
        sqlx::query_as::<_, EventRow>(
            r#"SELECT
                e.id,
                e.title,
                e.event_type,
                e.start_date,
                e.end_date,
                e.start_time,
                e.end_time,
                e.status,
                e.representative_id,
                e.customer_id,
                c.name AS customer_name
             FROM events e
             LEFT JOIN customers c ON c.id = e.customer_id
             WHERE ($1::uuid IS NULL OR e.customer_id = $1)
               AND ($2::uuid IS NULL OR e.representative_id = $2)
               AND e.start_date <= $4
               AND COALESCE(e.end_date, e.start_date) >= $3
             ORDER BY e.start_date, e.start_time NULLS FIRST, e.id"#,
        )
        .bind(scope.customer_id())
        .bind(scope.representative_id())
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(log_failure("events"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_exhaustion_is_unavailable() {
        let err = log_failure("orders")(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(ref msg) if msg.contains("orders")));

        let err = log_failure("events")(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
