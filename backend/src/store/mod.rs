//! Read-only access to the sales records the analytics engine consumes.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use fieldrep_shared::{CustomerRecord, EventRow, OrderRow, ProductRecord, SaleLineRow};

use crate::analytics::period::DateWindow;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgSalesStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ownership filter applied to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum OwnerScope {
    All,
    Customer(Uuid),
    Representative(Uuid),
}

impl OwnerScope {
    pub fn customer_id(&self) -> Option<Uuid> {
        match self {
            Self::Customer(id) => Some(*id),
            _ => None,
        }
    }

    pub fn representative_id(&self) -> Option<Uuid> {
        match self {
            Self::Representative(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether a record owned by `customer_id` / `representative_id` is visible.
    pub fn owns(&self, customer_id: Option<Uuid>, representative_id: Option<Uuid>) -> bool {
        match self {
            Self::All => true,
            Self::Customer(id) => customer_id == Some(*id),
            Self::Representative(id) => representative_id == Some(*id),
        }
    }
}

/// Query capability supplied by the storage layer.
///
/// Rows come back in a stable order so that rollup tie-breaks are
/// reproducible between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Orders joined with customer name, region and line item count.
    async fn orders(&self, scope: OwnerScope) -> StoreResult<Vec<OrderRow>>;

    /// Line items joined with their order, product, customer and representative.
    async fn sale_lines(&self, scope: OwnerScope) -> StoreResult<Vec<SaleLineRow>>;

    async fn products(&self) -> StoreResult<Vec<ProductRecord>>;

    /// Customers visible to the scope; a representative sees assigned customers.
    async fn customers(&self, scope: OwnerScope) -> StoreResult<Vec<CustomerRecord>>;

    /// Events whose date span overlaps `window`.
    async fn events(&self, scope: OwnerScope, window: DateWindow) -> StoreResult<Vec<EventRow>>;
}
