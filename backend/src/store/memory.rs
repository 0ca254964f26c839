//! In-process [`SalesStore`] over plain record vectors.
//!
//! Performs the same joins and ownership predicates as the Postgres store.
//! Rows keep insertion order.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use fieldrep_shared::{
    CustomerRecord, EventRecord, EventRow, LineItemRecord, OrderRecord, OrderRow, ProductRecord,
    RepresentativeRecord, SaleLineRow,
};

use super::{OwnerScope, SalesStore, StoreResult};
use crate::analytics::period::DateWindow;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub orders: Vec<OrderRecord>,
    pub line_items: Vec<LineItemRecord>,
    pub products: Vec<ProductRecord>,
    pub customers: Vec<CustomerRecord>,
    pub representatives: Vec<RepresentativeRecord>,
    pub events: Vec<EventRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn customer(&self, id: Option<Uuid>) -> Option<&CustomerRecord> {
        id.and_then(|id| self.customers.iter().find(|c| c.id == id))
    }

    fn product(&self, id: Option<Uuid>) -> Option<&ProductRecord> {
        id.and_then(|id| self.products.iter().find(|p| p.id == id))
    }

    fn representative(&self, id: Option<Uuid>) -> Option<&RepresentativeRecord> {
        id.and_then(|id| self.representatives.iter().find(|r| r.id == id))
    }
}

#[async_trait]
impl SalesStore for MemoryStore {
    async fn orders(&self, scope: OwnerScope) -> StoreResult<Vec<OrderRow>> {
        let mut item_counts: HashMap<Uuid, i64> = HashMap::new();
        for item in &self.line_items {
            *item_counts.entry(item.order_id).or_insert(0) += 1;
        }

        Ok(self
            .orders
            .iter()
            .filter(|o| scope.owns(o.customer_id, o.representative_id))
            .map(|o| {
                let customer = self.customer(o.customer_id);
                OrderRow {
                    id: o.id,
                    customer_id: o.customer_id,
                    representative_id: o.representative_id,
                    customer_name: customer.map(|c| c.name.clone()),
                    region: customer.and_then(|c| c.region.clone()),
                    sale_date: o.sale_date.clone(),
                    total_amount: o.total_amount,
                    status: o.status.clone(),
                    item_count: item_counts.get(&o.id).copied().unwrap_or(0),
                }
            })
            .collect())
    }

    async fn sale_lines(&self, scope: OwnerScope) -> StoreResult<Vec<SaleLineRow>> {
        let orders: HashMap<Uuid, &OrderRecord> = self.orders.iter().map(|o| (o.id, o)).collect();

        Ok(self
            .line_items
            .iter()
            .filter_map(|item| orders.get(&item.order_id).map(|order| (item, *order)))
            .filter(|(_, order)| scope.owns(order.customer_id, order.representative_id))
            .map(|(item, order)| {
                let product = self.product(item.product_id);
                let customer = self.customer(order.customer_id);
                SaleLineRow {
                    id: item.id,
                    order_id: item.order_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    line_total: item.line_total,
                    promo: item.promo.clone(),
                    discount: item.discount,
                    free_quantity: item.free_quantity,
                    customer_id: order.customer_id,
                    representative_id: order.representative_id,
                    sale_date: order.sale_date.clone(),
                    status: order.status.clone(),
                    product_name: product.map(|p| p.brand_name.clone()),
                    category: product.and_then(|p| p.category.clone()),
                    customer_name: customer.map(|c| c.name.clone()),
                    region: customer.and_then(|c| c.region.clone()),
                    representative_name: self
                        .representative(order.representative_id)
                        .map(|r| r.name.clone()),
                }
            })
            .collect())
    }

    async fn products(&self) -> StoreResult<Vec<ProductRecord>> {
        Ok(self.products.clone())
    }

    async fn customers(&self, scope: OwnerScope) -> StoreResult<Vec<CustomerRecord>> {
        Ok(self
            .customers
            .iter()
            .filter(|c| match scope {
                OwnerScope::All => true,
                OwnerScope::Customer(id) => c.id == id,
                OwnerScope::Representative(id) => c.representative_id == Some(id),
            })
            .cloned()
            .collect())
    }

    async fn events(&self, scope: OwnerScope, window: DateWindow) -> StoreResult<Vec<EventRow>> {
        Ok(self
            .events
            .iter()
            .filter(|e| scope.owns(e.customer_id, Some(e.representative_id)))
            .filter(|e| window.overlaps(e.start_date, e.end_date.unwrap_or(e.start_date)))
            .map(|e| EventRow {
                id: e.id,
                title: e.title.clone(),
                event_type: e.event_type.clone(),
                start_date: e.start_date,
                end_date: e.end_date,
                start_time: e.start_time,
                end_time: e.end_time,
                status: e.status.clone(),
                representative_id: e.representative_id,
                customer_id: e.customer_id,
                customer_name: self.customer(e.customer_id).map(|c| c.name.clone()),
            })
            .collect())
    }
}
