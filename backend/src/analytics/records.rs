//! Canonical engine records.
//!
//! Rows arriving from storage carry the sale date as `month/day/year` text.
//! They are parsed once here; the rest of the engine works with [`SaleDate`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use fieldrep_shared::{OrderRow, SaleLineRow};

use super::period::DateWindow;

pub const SALE_DATE_FORMAT: &str = "%m/%d/%Y";

pub fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), SALE_DATE_FORMAT).ok()
}

/// Sale date text together with its parsed value, if it parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDate {
    raw: String,
    date: Option<NaiveDate>,
}

impl SaleDate {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let date = parse_sale_date(&raw);
        Self { raw, date }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Unparseable dates are never inside a window.
    pub fn within(&self, window: &DateWindow) -> bool {
        self.date.is_some_and(|date| window.contains(date))
    }

    /// Loose year match on the raw text, used for year-only filtering.
    pub fn mentions_year(&self, year: i32) -> bool {
        self.raw.contains(&year.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn counts_as_sale(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" | "complete" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

fn status_or_pending(raw: &str, record_id: Uuid) -> OrderStatus {
    raw.parse().unwrap_or_else(|err: UnknownStatus| {
        tracing::debug!(%record_id, "{}, treating as pending", err);
        OrderStatus::Pending
    })
}

fn canonical_date(raw: String, record_id: Uuid) -> SaleDate {
    let sale_date = SaleDate::parse(raw);
    if sale_date.date().is_none() {
        tracing::warn!(%record_id, sale_date = sale_date.raw(), "unparseable sale date");
    }
    sale_date
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub representative_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub region: Option<String>,
    pub sale_date: SaleDate,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub item_count: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            status: status_or_pending(&row.status, row.id),
            sale_date: canonical_date(row.sale_date, row.id),
            id: row.id,
            customer_id: row.customer_id,
            representative_id: row.representative_id,
            customer_name: row.customer_name,
            region: row.region,
            total_amount: row.total_amount,
            item_count: row.item_count,
        }
    }
}

/// One line item with the order, product and customer columns it was joined to.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub representative_id: Option<Uuid>,
    pub representative_name: Option<String>,
    pub region: Option<String>,
    pub sale_date: SaleDate,
    pub status: OrderStatus,
    pub quantity: i64,
    pub free_quantity: i64,
    pub line_total: Decimal,
    pub discount: Decimal,
    pub promo: Option<String>,
}

impl From<SaleLineRow> for SaleLine {
    fn from(row: SaleLineRow) -> Self {
        Self {
            status: status_or_pending(&row.status, row.id),
            sale_date: canonical_date(row.sale_date, row.id),
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            category: row.category,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            representative_id: row.representative_id,
            representative_name: row.representative_name,
            region: row.region,
            quantity: i64::from(row.quantity),
            free_quantity: row.free_quantity.map(i64::from).unwrap_or(0),
            line_total: row.line_total,
            discount: row.discount.unwrap_or(Decimal::ZERO),
            promo: row.promo,
        }
    }
}
