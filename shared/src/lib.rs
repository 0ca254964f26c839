use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==================== Stored Records ====================

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub representative_id: Option<Uuid>,
    pub sale_date: String, // month/day/year, e.g. "06/05/2025"
    pub total_amount: Decimal,
    pub status: String, // pending, completed, cancelled
}

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub line_total: Decimal,
    pub promo: Option<String>,
    pub discount: Option<Decimal>,
    pub free_quantity: Option<i32>,
}

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: Uuid,
    pub brand_name: String,
    pub generic_name: Option<String>,
    pub category: Option<String>, // exclusive, non_exclusive, regulated
    pub price: Decimal,
    pub inventory: i32,
}

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub name: String,
    pub region: Option<String>,
    pub representative_id: Option<Uuid>,
}

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepresentativeRecord {
    pub id: Uuid,
    pub name: String,
    pub region: Option<String>,
}

#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub title: String,
    pub event_type: String, // visit, call, meeting, delivery
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: String,
    pub representative_id: Uuid,
    pub customer_id: Option<Uuid>,
}

// ==================== Joined Rows ====================
//
// Shapes returned by the storage read queries. Joined columns are optional
// because the related record may be missing.

/// An order joined with its customer and line item count.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub representative_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub region: Option<String>,
    pub sale_date: String,
    pub total_amount: Decimal,
    pub status: String,
    pub item_count: i64,
}

/// A line item joined with its order, product, customer and representative.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub line_total: Decimal,
    pub promo: Option<String>,
    pub discount: Option<Decimal>,
    pub free_quantity: Option<i32>,
    pub customer_id: Option<Uuid>,
    pub representative_id: Option<Uuid>,
    pub sale_date: String,
    pub status: String,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub customer_name: Option<String>,
    pub region: Option<String>,
    pub representative_name: Option<String>,
}

/// A scheduled event joined with its customer's name.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub event_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: String,
    pub representative_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
}

impl EventRow {
    /// End date used for span checks; a missing end means a one-day event.
    pub fn effective_end(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }

    pub fn is_multi_day(&self) -> bool {
        self.end_date.is_some_and(|end| end != self.start_date)
    }
}
